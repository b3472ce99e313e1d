//! Application state for Axum handlers.

use bookshelf_service::{BookService, HealthService};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub book_service: Arc<dyn BookService>,
    pub health_service: Arc<dyn HealthService>,
    /// Deadline given to each request's store and cache calls.
    pub request_timeout: Duration,
    /// Parent of every request's cancellation token. Cancelled when the
    /// shutdown grace period runs out.
    pub abandon: CancellationToken,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        book_service: Arc<dyn BookService>,
        health_service: Arc<dyn HealthService>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            book_service,
            health_service,
            request_timeout,
            abandon: CancellationToken::new(),
        }
    }

    /// Replaces the abandon token with one owned by the lifecycle orchestrator.
    #[must_use]
    pub fn with_abandon_token(mut self, token: CancellationToken) -> Self {
        self.abandon = token;
        self
    }
}
