//! Per-request deadline and cancellation.

use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use bookshelf_core::RequestContext;
use std::convert::Infallible;

/// Extracts a fresh [`RequestContext`] for the current request.
///
/// The context expires after the configured request timeout and is
/// cancelled together with the application's abandon token.
#[derive(Debug, Clone)]
pub struct Context(pub RequestContext);

#[async_trait]
impl FromRequestParts<AppState> for Context {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(RequestContext::child(
            &state.abandon,
            state.request_timeout,
        )))
    }
}
