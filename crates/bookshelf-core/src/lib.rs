//! # Bookshelf Core
//!
//! Core types, request context, and error definitions for Bookshelf.
//! Every other crate in the workspace builds on the types defined here.

pub mod context;
pub mod domain;
pub mod error;
pub mod result;
pub mod validation;

pub use context::*;
pub use domain::*;
pub use error::*;
pub use result::*;
pub use validation::*;
