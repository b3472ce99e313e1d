//! # Bookshelf Service
//!
//! Domain services sitting between the HTTP layer and the repository.
//! [`BookService`] validates before any I/O. [`HealthService`] probes the
//! store and cache clients directly.

pub mod book_service;
pub mod health_service;
mod r#impl;

pub use book_service::*;
pub use health_service::*;
pub use r#impl::{BookServiceImpl, HealthServiceImpl};
