//! services/client/src/services/mod.rs
//!
//! Typed resource services. Each one turns a domain operation into a path and
//! an `ApiRequest`; none of them holds state beyond the transport handle and
//! an optional cancellation token.

pub mod categories;
pub mod cookbooks;
pub mod recipes;
pub mod reviews;

pub use categories::CategoryService;
pub use cookbooks::CookbookService;
pub use recipes::{RecipeQuery, RecipeService};
pub use reviews::ReviewService;

use ezchef_core::ports::{decode, ApiRequest, HttpService, PortResult};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared plumbing for the resource services.
#[derive(Clone)]
pub(crate) struct Backend {
    http: Arc<dyn HttpService>,
    cancel: Option<CancellationToken>,
}

impl Backend {
    pub(crate) fn new(http: Arc<dyn HttpService>) -> Self {
        Self { http, cancel: None }
    }

    pub(crate) fn scoped(&self, token: CancellationToken) -> Self {
        Self {
            http: self.http.clone(),
            cancel: Some(token),
        }
    }

    /// Sends `request` and decodes the JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> PortResult<T> {
        let body = self
            .http
            .send(request.with_cancel(self.cancel.clone()))
            .await?;
        decode(body)
    }

    /// Sends `request` and discards whatever body comes back.
    pub(crate) async fn execute(&self, request: ApiRequest) -> PortResult<()> {
        self.http
            .send(request.with_cancel(self.cancel.clone()))
            .await
            .map(|_| ())
    }
}

/// Every resource service, sharing one transport.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
    pub recipes: RecipeService,
    pub cookbooks: CookbookService,
    pub reviews: ReviewService,
}

impl Services {
    pub fn new(http: Arc<dyn HttpService>) -> Self {
        let backend = Backend::new(http);
        Self {
            categories: CategoryService {
                backend: backend.clone(),
            },
            recipes: RecipeService {
                backend: backend.clone(),
            },
            cookbooks: CookbookService {
                backend: backend.clone(),
            },
            reviews: ReviewService { backend },
        }
    }

    /// A copy whose requests are all cancelled when `token` fires.
    pub fn scoped(&self, token: &CancellationToken) -> Self {
        Self {
            categories: self.categories.with_cancel(token.clone()),
            recipes: self.recipes.with_cancel(token.clone()),
            cookbooks: self.cookbooks.with_cancel(token.clone()),
            reviews: self.reviews.with_cancel(token.clone()),
        }
    }
}
