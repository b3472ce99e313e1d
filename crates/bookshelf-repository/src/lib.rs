//! # Bookshelf Repository
//!
//! Data access for book records:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn BookRepository>       (domain contract)
//! CachedBookRepository              (cache-aside policy)
//!   ↓                   ↓
//! Arc<dyn BookStore>    Arc<dyn CacheClient>
//! PgBookStore           RedisCacheService
//!   ↓                   ↓
//! PostgreSQL            Redis
//! ```
//!
//! The store is the system of record. The cache is disposable: every cache
//! failure inside [`CachedBookRepository`] is logged and swallowed.
//!
//! [`memory`] holds in-process variants of all three seams for tests and
//! local runs.

pub mod cache;
mod cached_book_repository;
pub mod memory;
mod pool;
pub mod postgres;
mod store;
mod traits;

pub use cache::{cache_keys, CacheClient, CacheExt, RedisCacheService, DEFAULT_TTL};
pub use cached_book_repository::CachedBookRepository;
pub use pool::*;
pub use postgres::PgBookStore;
pub use store::BookStore;
pub use traits::*;
