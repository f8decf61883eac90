//! services/client/src/views/categories.rs

use super::{inline_message, ViewScope};
use crate::services::{CategoryService, Services};
use ezchef_core::domain::Category;
use ezchef_core::filter::filter_categories;
use ezchef_core::ports::PortResult;

pub struct CategoryListView {
    categories: CategoryService,
    source: Vec<Category>,
    search: String,
    loading: bool,
    error: Option<String>,
    scope: ViewScope,
}

impl CategoryListView {
    pub fn new(services: &Services) -> Self {
        let scope = ViewScope::new();
        Self {
            categories: services.categories.with_cancel(scope.token()),
            source: Vec::new(),
            search: String::new(),
            loading: false,
            error: None,
            scope,
        }
    }

    pub async fn load(&mut self) -> PortResult<()> {
        self.loading = true;
        self.error = None;
        let result = self.categories.list().await;
        self.loading = false;

        match result {
            Ok(categories) => {
                self.source = categories;
                Ok(())
            }
            Err(e) => {
                self.error = inline_message("fetching categories", &e);
                Err(e)
            }
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Categories matching the current search; recomputed on every call.
    pub fn visible(&self) -> Vec<Category> {
        filter_categories(&self.source, &self.search)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn close(self) {
        self.scope.cancel();
    }
}
