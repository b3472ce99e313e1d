//! PostgreSQL implementations.

mod book_store;

pub use book_store::PgBookStore;
