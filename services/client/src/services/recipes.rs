//! services/client/src/services/recipes.rs
//!
//! Recipe listing, search and CRUD.

use super::Backend;
use ezchef_core::domain::{CookbookId, Difficulty, Recipe, RecipeDraft, RecipeId, UserId};
use ezchef_core::filter::{RecipeFilter, SortKey};
use ezchef_core::ports::{ApiRequest, PortResult};
use ezchef_core::validation::validate_recipe;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Server-side filters for `GET /api/recipes`. Unset fields are left out of
/// the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub category: Option<String>,
    pub region: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub not_in_cookbook: Option<CookbookId>,
}

impl RecipeQuery {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("category", self.category.as_deref())
            .query_opt("region", self.region.as_deref())
            .query_opt("difficulty", self.difficulty)
            .query_opt("search", self.search.as_deref())
            .query_opt("sort", self.sort)
            .query_opt("notInCookbook", self.not_in_cookbook)
    }
}

impl From<&RecipeFilter> for RecipeQuery {
    fn from(filter: &RecipeFilter) -> Self {
        Self {
            category: filter.category.clone(),
            region: filter.region.clone(),
            difficulty: filter.difficulty,
            search: Some(filter.search.clone()),
            sort: Some(filter.sort),
            not_in_cookbook: None,
        }
    }
}

#[derive(Clone)]
pub struct RecipeService {
    pub(crate) backend: Backend,
}

impl RecipeService {
    pub fn with_cancel(&self, token: CancellationToken) -> Self {
        Self {
            backend: self.backend.scoped(token),
        }
    }

    /// GET /api/recipes
    pub async fn list(&self, query: &RecipeQuery) -> PortResult<Vec<Recipe>> {
        self.backend
            .fetch(query.apply(ApiRequest::get("/api/recipes")))
            .await
    }

    /// GET /api/recipes/search
    pub async fn search(&self, term: &str, query: &RecipeQuery) -> PortResult<Vec<Recipe>> {
        let query = RecipeQuery {
            search: Some(term.to_string()),
            ..query.clone()
        };
        self.backend
            .fetch(query.apply(ApiRequest::get("/api/recipes/search")))
            .await
    }

    /// GET /api/recipes/:id
    pub async fn get(&self, id: RecipeId) -> PortResult<Recipe> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/recipes/{}", id)))
            .await
    }

    /// GET /api/users/:userId/recipes
    pub async fn by_user(&self, user_id: UserId) -> PortResult<Vec<Recipe>> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/users/{}/recipes", user_id)))
            .await
    }

    /// POST /api/recipes
    pub async fn create(&self, draft: &RecipeDraft) -> PortResult<Recipe> {
        validate_recipe(draft)?;
        let recipe: Recipe = self
            .backend
            .fetch(ApiRequest::post("/api/recipes").body(draft)?)
            .await?;
        info!("Created recipe {} ({})", recipe.id, recipe.name);
        Ok(recipe)
    }

    /// PUT /api/recipes/:id
    pub async fn update(&self, id: RecipeId, draft: &RecipeDraft) -> PortResult<Recipe> {
        validate_recipe(draft)?;
        self.backend
            .fetch(ApiRequest::put(format!("/api/recipes/{}", id)).body(draft)?)
            .await
    }

    /// DELETE /api/recipes/:id
    pub async fn delete(&self, id: RecipeId) -> PortResult<()> {
        self.backend
            .execute(ApiRequest::delete(format!("/api/recipes/{}", id)))
            .await?;
        info!("Deleted recipe {}", id);
        Ok(())
    }
}
