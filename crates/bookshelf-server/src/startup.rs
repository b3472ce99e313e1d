//! Command line handling and startup output.

use bookshelf_core::{BookshelfError, BookshelfResult};
use tracing::info;

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve HTTP until a termination signal.
    Serve,
    /// Create the schema and exit.
    Init,
}

impl Command {
    /// Parses the arguments after the program name. No argument means
    /// [`Command::Serve`].
    pub fn parse<I>(args: I) -> BookshelfResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        match args.into_iter().next().as_deref() {
            None | Some("serve") => Ok(Self::Serve),
            Some("init") => Ok(Self::Init),
            Some(other) => Err(BookshelfError::Configuration(format!(
                "unknown command '{}' (expected 'init' or 'serve')",
                other
            ))),
        }
    }
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Books:     http://{}/books", addr);
    info!("Health:    http://{}/health", addr);
    info!("Ready:     http://{}/ready", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!("{}", separator);
}
