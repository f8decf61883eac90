//! services/client/src/services/categories.rs

use super::Backend;
use ezchef_core::domain::{Category, CategoryId, Recipe};
use ezchef_core::ports::{ApiRequest, PortResult};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct CategoryService {
    pub(crate) backend: Backend,
}

impl CategoryService {
    pub fn with_cancel(&self, token: CancellationToken) -> Self {
        Self {
            backend: self.backend.scoped(token),
        }
    }

    /// GET /api/categories/
    pub async fn list(&self) -> PortResult<Vec<Category>> {
        self.backend.fetch(ApiRequest::get("/api/categories/")).await
    }

    /// GET /api/categories/:id/
    pub async fn get(&self, id: CategoryId) -> PortResult<Category> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/categories/{}/", id)))
            .await
    }

    /// GET /api/categories/:id/recipes/
    pub async fn recipes(&self, id: CategoryId, search: &str) -> PortResult<Vec<Recipe>> {
        self.backend
            .fetch(
                ApiRequest::get(format!("/api/categories/{}/recipes/", id))
                    .query("search", search),
            )
            .await
    }

    /// Every category type the backend knows, e.g. "Dessert".
    pub async fn types(&self) -> PortResult<Vec<String>> {
        self.backend.fetch(ApiRequest::get("/api/categories/types")).await
    }

    /// Every category region the backend knows, e.g. "Thai".
    pub async fn regions(&self) -> PortResult<Vec<String>> {
        self.backend.fetch(ApiRequest::get("/api/categories/regions")).await
    }
}
