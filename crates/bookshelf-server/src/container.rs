//! Application wiring.

use bookshelf_config::AppConfig;
use bookshelf_core::BookshelfResult;
use bookshelf_repository::{
    create_pool, BookRepository, CachedBookRepository, DatabasePool, PgBookStore,
    RedisCacheService,
};
use bookshelf_rest::AppState;
use bookshelf_service::{BookService, BookServiceImpl, HealthService, HealthServiceImpl};
use std::sync::Arc;
use tracing::info;

/// Process-wide singletons, built once at startup and torn down once at
/// shutdown.
pub struct AppContainer {
    config: AppConfig,
    db_pool: Arc<DatabasePool>,
    cache: Arc<RedisCacheService>,
    book_service: Arc<dyn BookService>,
    health_service: Arc<dyn HealthService>,
}

impl AppContainer {
    /// Builds the pools and services. No connection is opened yet.
    pub fn build(config: AppConfig) -> BookshelfResult<Self> {
        let db_pool = create_pool(&config.database)?;
        let cache = Arc::new(RedisCacheService::from_config(&config.redis)?);
        let store = Arc::new(PgBookStore::new(db_pool.clone()));

        let repository: Arc<dyn BookRepository> = Arc::new(CachedBookRepository::new(
            store.clone(),
            cache.clone(),
            config.cache.ttl(),
        ));
        let book_service: Arc<dyn BookService> = Arc::new(BookServiceImpl::new(repository));
        let health_service: Arc<dyn HealthService> =
            Arc::new(HealthServiceImpl::new(store, cache.clone()));

        info!("Application container built");
        Ok(Self {
            config,
            db_pool,
            cache,
            book_service,
            health_service,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn db_pool(&self) -> &Arc<DatabasePool> {
        &self.db_pool
    }

    /// State handed to the router.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.book_service.clone(),
            self.health_service.clone(),
            self.config.server.request_timeout(),
        )
    }

    /// Releases the Postgres and Redis pools.
    pub async fn close(&self) {
        self.db_pool.close().await;
        self.cache.close();
    }
}
