//! Database connection pool management.

use bookshelf_config::DatabaseConfig;
use bookshelf_core::{BookshelfError, BookshelfResult, RequestContext};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// PostgreSQL pool wrapper shared by every request.
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Creates a pool that opens connections on first use.
    ///
    /// Startup does not fail when the database is down; readiness reports it
    /// instead.
    pub fn new(config: &DatabaseConfig) -> BookshelfResult<Self> {
        let pool = Self::options(config).connect_lazy(&config.url).map_err(|e| {
            warn!("Invalid database configuration: {}", e);
            BookshelfError::Database(format!("Failed to configure pool: {}", e))
        })?;

        info!(
            max_connections = config.max_connections,
            "PostgreSQL connection pool configured"
        );
        Ok(Self { pool })
    }

    /// Creates a pool and opens its first connection immediately.
    pub async fn connect(config: &DatabaseConfig) -> BookshelfResult<Self> {
        info!("Connecting to PostgreSQL database...");

        let pool = Self::options(config)
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                BookshelfError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    fn options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &PgPool {
        &self.pool
    }

    /// Checks connectivity with `SELECT 1`.
    pub async fn health_check(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        ctx.run("store.ping", async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| BookshelfError::Database(format!("Health check failed: {}", e)))
        })
        .await
    }

    /// Creates the `books` table if it does not exist.
    pub async fn run_migrations(&self) -> BookshelfResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BookshelfError::Database(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// Checks whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared, lazily connected database pool.
pub fn create_pool(config: &DatabaseConfig) -> BookshelfResult<Arc<DatabasePool>> {
    Ok(Arc::new(DatabasePool::new(config)?))
}
