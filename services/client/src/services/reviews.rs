//! services/client/src/services/reviews.rs

use super::Backend;
use ezchef_core::domain::{RecipeId, Review, ReviewDraft, ReviewId, UserId};
use ezchef_core::ports::{ApiRequest, PortResult};
use ezchef_core::validation::validate_review;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct ReviewService {
    pub(crate) backend: Backend,
}

impl ReviewService {
    pub fn with_cancel(&self, token: CancellationToken) -> Self {
        Self {
            backend: self.backend.scoped(token),
        }
    }

    /// POST /api/reviews
    pub async fn create(&self, draft: &ReviewDraft) -> PortResult<Review> {
        validate_review(draft)?;
        self.backend
            .fetch(ApiRequest::post("/api/reviews").body(draft)?)
            .await
    }

    /// GET /api/recipes/:id/reviews
    pub async fn for_recipe(&self, recipe_id: RecipeId) -> PortResult<Vec<Review>> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/recipes/{}/reviews", recipe_id)))
            .await
    }

    /// GET /api/users/:id/reviews
    pub async fn by_user(&self, user_id: UserId) -> PortResult<Vec<Review>> {
        self.backend
            .fetch(ApiRequest::get(format!("/api/users/{}/reviews", user_id)))
            .await
    }

    /// PUT /api/reviews/:id
    pub async fn update(&self, id: ReviewId, draft: &ReviewDraft) -> PortResult<Review> {
        validate_review(draft)?;
        self.backend
            .fetch(ApiRequest::put(format!("/api/reviews/{}", id)).body(draft)?)
            .await
    }

    /// DELETE /api/reviews/:id
    pub async fn delete(&self, id: ReviewId) -> PortResult<()> {
        self.backend
            .execute(ApiRequest::delete(format!("/api/reviews/{}", id)))
            .await
    }
}
