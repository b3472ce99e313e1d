//! Cache client trait for abstracted caching operations.

use bookshelf_core::{BookshelfError, BookshelfResult, RequestContext};
use async_trait::async_trait;
use std::time::Duration;

/// Cache client for storing and retrieving cached data.
///
/// Values are JSON strings so the trait stays dyn-compatible. Every call runs
/// under the caller's [`RequestContext`].
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, ctx: &RequestContext, key: &str) -> BookshelfResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> BookshelfResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, ctx: &RequestContext, key: &str) -> BookshelfResult<bool>;

    /// Verifies connectivity.
    async fn ping(&self, ctx: &RequestContext) -> BookshelfResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed get/set on top of [`CacheClient`].
///
/// Decode and encode failures are reported as [`BookshelfError::Cache`].
#[async_trait]
pub trait CacheExt: CacheClient {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> BookshelfResult<Option<T>> {
        match self.get_raw(ctx, key).await? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
                BookshelfError::Cache(format!("Malformed value under '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> BookshelfResult<()> {
        let json = serde_json::to_string(value).map_err(|e| {
            BookshelfError::Cache(format!("Failed to encode value for '{}': {}", key, e))
        })?;
        self.set_raw(ctx, key, &json, ttl).await
    }
}

impl<T: CacheClient + ?Sized> CacheExt for T {}
