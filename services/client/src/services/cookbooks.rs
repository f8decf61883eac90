//! services/client/src/services/cookbooks.rs
//!
//! Cookbook CRUD and recipe membership.

use super::Backend;
use ezchef_core::domain::{
    Cookbook, CookbookDraft, CookbookId, CookbookUpdate, Recipe, RecipeId, UserId,
};
use ezchef_core::ports::{ApiRequest, PortResult};
use ezchef_core::validation::{validate_cookbook_title, validate_cookbook_update};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Clone)]
pub struct CookbookService {
    pub(crate) backend: Backend,
}

impl CookbookService {
    pub fn with_cancel(&self, token: CancellationToken) -> Self {
        Self {
            backend: self.backend.scoped(token),
        }
    }

    /// GET /api/users/:userId/cookbooks
    pub async fn for_user(&self, user_id: UserId) -> PortResult<Vec<Cookbook>> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/users/{}/cookbooks", user_id)))
            .await
    }

    /// GET /api/cookbooks/:id
    pub async fn get(&self, id: CookbookId) -> PortResult<Cookbook> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/cookbooks/{}", id)))
            .await
    }

    /// POST /api/cookbooks
    pub async fn create(&self, draft: &CookbookDraft) -> PortResult<Cookbook> {
        validate_cookbook_title(&draft.title)?;
        let draft = CookbookDraft {
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            ..draft.clone()
        };
        let cookbook: Cookbook = self
            .backend
            .fetch(ApiRequest::post("/api/cookbooks").body(&draft)?)
            .await?;
        info!("Created cookbook {} for user {}", cookbook.id, draft.user_id);
        Ok(cookbook)
    }

    /// PATCH /api/cookbooks/:id
    pub async fn update(&self, id: CookbookId, update: &CookbookUpdate) -> PortResult<Cookbook> {
        validate_cookbook_update(update)?;
        let update = CookbookUpdate {
            title: update.title.trim().to_string(),
            description: update.description.trim().to_string(),
        };
        self.backend
            .fetch(ApiRequest::patch(format!("/api/cookbooks/{}", id)).body(&update)?)
            .await
    }

    /// DELETE /api/cookbooks/:id
    pub async fn delete(&self, id: CookbookId) -> PortResult<()> {
        self.backend
            .execute(ApiRequest::delete(format!("/api/cookbooks/{}", id)))
            .await?;
        info!("Deleted cookbook {}", id);
        Ok(())
    }

    /// POST /api/cookbooks/:id/recipes/:recipeId
    pub async fn add_recipe(&self, id: CookbookId, recipe_id: RecipeId) -> PortResult<()> {
        self.backend
            .execute(ApiRequest::post(format!("/api/cookbooks/{}/recipes/{}", id, recipe_id)))
            .await
    }

    /// DELETE /api/cookbooks/:id/recipes/:recipeId
    pub async fn remove_recipe(&self, id: CookbookId, recipe_id: RecipeId) -> PortResult<()> {
        self.backend
            .execute(ApiRequest::delete(format!("/api/cookbooks/{}/recipes/{}", id, recipe_id)))
            .await
    }

    /// Recipes that are not yet in the cookbook (`GET /api/recipes?notInCookbook=:id`).
    pub async fn available_recipes(&self, id: CookbookId) -> PortResult<Vec<Recipe>> {
        self.backend
            .fetch(ApiRequest::get("/api/recipes").query("notInCookbook", id))
            .await
    }
}
