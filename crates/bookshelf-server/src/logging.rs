//! Tracing subscriber setup.

use bookshelf_config::ObservabilityConfig;
use bookshelf_core::{BookshelfError, BookshelfResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. sqlx logs every statement at
/// `info`, so it is held to `warn`.
#[must_use]
pub fn default_directives(level: &str) -> String {
    format!("{},sqlx=warn", level.to_lowercase())
}

/// Installs the global subscriber: `RUST_LOG` wins over the configured level,
/// `log_format = "json"` switches to JSON lines.
pub fn init_logging(config: &ObservabilityConfig) -> BookshelfResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| BookshelfError::Internal(format!("Failed to initialize logging: {}", e)))
}
