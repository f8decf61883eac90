//! services/client/src/views/recipes.rs

use super::{inline_message, ViewScope};
use crate::services::{RecipeQuery, RecipeService, Services};
use ezchef_core::domain::{Difficulty, Recipe};
use ezchef_core::filter::{filter_recipes, RecipeFilter, SortKey};
use ezchef_core::ports::PortResult;
use tokio_util::sync::CancellationToken;

/// The "all recipes" screen: one fetch, then client-side filtering.
pub struct RecipeListView {
    recipes: RecipeService,
    source: Vec<Recipe>,
    filter: RecipeFilter,
    visible: Vec<Recipe>,
    loading: bool,
    error: Option<String>,
    scope: ViewScope,
}

impl RecipeListView {
    pub fn new(services: &Services) -> Self {
        let scope = ViewScope::new();
        Self {
            recipes: services.recipes.with_cancel(scope.token()),
            source: Vec::new(),
            filter: RecipeFilter::default(),
            visible: Vec::new(),
            loading: false,
            error: None,
            scope,
        }
    }

    /// Fetches the recipe list and re-applies the current filters.
    pub async fn load(&mut self) -> PortResult<()> {
        self.loading = true;
        self.error = None;
        let result = self.recipes.list(&RecipeQuery::default()).await;
        self.loading = false;

        match result {
            Ok(recipes) => {
                self.source = recipes;
                self.apply();
                Ok(())
            }
            Err(e) => {
                self.error = inline_message("fetching recipes", &e);
                Err(e)
            }
        }
    }

    /// Lets another task tear this view's requests down.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.scope.token()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.apply();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.apply();
    }

    pub fn set_region(&mut self, region: Option<String>) {
        self.filter.region = region;
        self.apply();
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.filter.difficulty = difficulty;
        self.apply();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.filter.sort = sort;
        self.apply();
    }

    pub fn set_filter(&mut self, filter: RecipeFilter) {
        self.filter = filter;
        self.apply();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.apply();
    }

    pub fn filter(&self) -> &RecipeFilter {
        &self.filter
    }

    pub fn visible(&self) -> &[Recipe] {
        &self.visible
    }

    pub fn source(&self) -> &[Recipe] {
        &self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// "1 Recipe Found" / "3 Recipes Found".
    pub fn summary(&self) -> String {
        let count = self.visible.len();
        let noun = if count == 1 { "Recipe" } else { "Recipes" };
        format!("{} {} Found", count, noun)
    }

    fn apply(&mut self) {
        self.visible = filter_recipes(&self.source, &self.filter);
    }
}
