//! Redis-based cache implementation.

use super::CacheClient;
use bookshelf_config::RedisConfig;
use bookshelf_core::{BookshelfError, BookshelfResult, RequestContext};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use std::time::Duration;
use tracing::{debug, info};

/// Default TTL for cached items (1 hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Redis-based cache service.
///
/// A disabled service answers every read with a miss, accepts every write
/// without storing it, and always pings successfully.
#[derive(Clone)]
pub struct RedisCacheService {
    pool: Option<Pool>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Builds the connection pool described by `config`.
    ///
    /// No connection is opened until the first command.
    pub fn from_config(config: &RedisConfig) -> BookshelfResult<Self> {
        if !config.enabled {
            info!("Redis cache disabled");
            return Ok(Self::disabled());
        }

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(PoolConfig::new(config.pool_size));
        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| BookshelfError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        info!(pool_size = config.pool_size, "Redis connection pool configured");
        Ok(Self::new(pool))
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> BookshelfResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                BookshelfError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(BookshelfError::Cache("Cache is disabled".to_string())),
        }
    }

    /// Closes the pool. Pending and later commands fail.
    pub fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Redis connection pool closed");
        }
    }
}

#[async_trait]
impl CacheClient for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, ctx: &RequestContext, key: &str) -> BookshelfResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let value: Option<String> = ctx
            .run("cache.get", async {
                let mut conn = self.get_conn().await?;
                conn.get(key).await.map_err(|e| {
                    BookshelfError::Cache(format!("Failed to get key '{}': {}", key, e))
                })
            })
            .await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> BookshelfResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let ttl_secs = ttl.as_secs().max(1);
        ctx.run("cache.set", async {
            let mut conn = self.get_conn().await?;
            conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                .await
                .map_err(|e| BookshelfError::Cache(format!("Failed to set key '{}': {}", key, e)))
        })
        .await?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, key: &str) -> BookshelfResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let deleted: i64 = ctx
            .run("cache.delete", async {
                let mut conn = self.get_conn().await?;
                conn.del(key).await.map_err(|e| {
                    BookshelfError::Cache(format!("Failed to delete key '{}': {}", key, e))
                })
            })
            .await?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn ping(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        ctx.run("cache.ping", async {
            let mut conn = self.get_conn().await?;
            deadpool_redis::redis::cmd("PING")
                .query_async(&mut conn)
                .await
                .map(|_: String| ())
                .map_err(|e| BookshelfError::Cache(format!("Ping failed: {}", e)))
        })
        .await
    }
}
