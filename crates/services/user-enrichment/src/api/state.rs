//! Application state for dependency injection.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::infra::Database;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub database: Database,
    /// Cancelled only once the shutdown grace period runs out
    abort: CancellationToken,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        database: Database,
        abort: CancellationToken,
    ) -> Self {
        Self {
            user_service,
            database,
            abort,
        }
    }

    /// Token for one request, cancelled together with the process abort.
    pub fn request_token(&self) -> CancellationToken {
        self.abort.child_token()
    }
}
