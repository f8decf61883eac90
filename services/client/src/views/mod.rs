//! services/client/src/views/mod.rs
//!
//! Screen-state holders. A view fetches on `load`, keeps its local filter
//! state, re-runs the filter pipeline on every change and turns errors into
//! an inline message. Each view owns a `ViewScope`; dropping the view
//! cancels whatever it still has in flight.

pub mod categories;
pub mod cookbooks;
pub mod recipes;

pub use categories::CategoryListView;
pub use cookbooks::{CookbookDetailView, CookbookListView};
pub use recipes::RecipeListView;

use ezchef_core::ports::ClientError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// The lifetime of one view. Cancelled on drop.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token for requests that belong to this view.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// The message a view shows for `err`, or `None` when nothing should be shown.
pub(crate) fn inline_message(context: &str, err: &ClientError) -> Option<String> {
    match err {
        ClientError::Cancelled => {
            debug!("{} cancelled", context);
            None
        }
        other => {
            error!("Error {}: {:?}", context, other);
            Some(other.to_string())
        }
    }
}
