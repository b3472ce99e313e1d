//! # Bookshelf Server Library
//!
//! Wiring, logging setup and the lifecycle orchestrator used by the
//! `bookshelf-server` binary.

pub mod container;
pub mod lifecycle;
pub mod logging;
pub mod startup;
