//! # Bookshelf REST
//!
//! HTTP surface for Bookshelf using Axum: `POST /books`, `GET /books`,
//! and the `/health`, `/live` and `/ready` probes.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
