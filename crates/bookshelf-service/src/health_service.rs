//! Health service trait definition.

use bookshelf_core::{BookshelfResult, HealthStatus, RequestContext};
use async_trait::async_trait;

/// Liveness and readiness probes.
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Always healthy while the process serves requests.
    fn liveness(&self) -> HealthStatus;

    /// Checks the store, then the cache. Stops at the first failure.
    async fn readiness(&self, ctx: &RequestContext) -> HealthStatus;

    /// Pings the durable store.
    async fn check_store_health(&self, ctx: &RequestContext) -> BookshelfResult<()>;

    /// Pings the cache.
    async fn check_cache_health(&self, ctx: &RequestContext) -> BookshelfResult<()>;
}
