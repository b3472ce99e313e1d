//! Volatile cache layer.
//!
//! A key/value store with per-key expiry, used as a read accelerator and an
//! invalidation target. Callers treat every error from it as soft.

mod cache_client;
pub mod cache_keys;
mod redis_cache;

pub use cache_client::{CacheClient, CacheExt};
pub use redis_cache::{RedisCacheService, DEFAULT_TTL};
