//! Health service implementation.

use crate::health_service::HealthService;
use bookshelf_core::{BookshelfResult, HealthStatus, RequestContext};
use bookshelf_repository::{BookStore, CacheClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Probes the store and cache clients directly.
///
/// Holds no state between calls: every probe is computed on demand.
pub struct HealthServiceImpl {
    store: Arc<dyn BookStore>,
    cache: Arc<dyn CacheClient>,
}

impl HealthServiceImpl {
    /// Creates a new health service.
    #[must_use]
    pub fn new(store: Arc<dyn BookStore>, cache: Arc<dyn CacheClient>) -> Self {
        Self { store, cache }
    }
}

#[async_trait]
impl HealthService for HealthServiceImpl {
    fn liveness(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    async fn readiness(&self, ctx: &RequestContext) -> HealthStatus {
        if let Err(e) = self.check_store_health(ctx).await {
            warn!("Readiness: store check failed: {}", e);
            return HealthStatus::not_ready(format!("database check failed: {}", e));
        }
        if let Err(e) = self.check_cache_health(ctx).await {
            warn!("Readiness: cache check failed: {}", e);
            return HealthStatus::not_ready(format!("cache check failed: {}", e));
        }
        HealthStatus::ready()
    }

    async fn check_store_health(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        self.store.ping(ctx).await
    }

    async fn check_cache_health(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        self.cache.ping(ctx).await
    }
}
