//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use bookshelf_core::BookshelfError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tracing::{debug, info};

/// Conventional variable naming the Postgres connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Conventional variable naming the Redis endpoint.
pub const REDIS_URL_VAR: &str = "REDIS_URL";

/// Layered configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `config_dir`.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `BOOKSHELF__` prefix (e.g. `BOOKSHELF__SERVER__PORT`)
    /// 5. `DATABASE_URL` / `REDIS_URL`
    pub fn load(config_dir: &str) -> Result<AppConfig, BookshelfError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("BOOKSHELF_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::load_layers(config_dir, &environment)?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<AppConfig, BookshelfError> {
        Self::load("./config")
    }

    /// Reads the file layers and the `BOOKSHELF__` environment layer.
    fn load_layers(config_dir: &str, environment: &str) -> Result<AppConfig, BookshelfError> {
        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("BOOKSHELF")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|config| config.try_deserialize::<AppConfig>())
            .map_err(config_error_to_bookshelf_error)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), BookshelfError> {
        ConfigValidator::validate(config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            BookshelfError::Configuration(message)
        })
    }
}

/// Applies `DATABASE_URL` and `REDIS_URL` on top of the layered configuration.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(DATABASE_URL_VAR).filter(|v| !v.is_empty()) {
        debug!("Using database URL from {}", DATABASE_URL_VAR);
        config.database.url = url;
    }
    if let Some(url) = lookup(REDIS_URL_VAR).filter(|v| !v.is_empty()) {
        debug!("Using Redis URL from {}", REDIS_URL_VAR);
        config.redis.url = normalize_redis_url(&url);
    }
}

/// Accepts a bare `host:port` and gives it the `redis://` scheme.
#[must_use]
pub fn normalize_redis_url(url: &str) -> String {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        url.to_string()
    } else {
        format!("redis://{}", url)
    }
}

fn config_error_to_bookshelf_error(err: ConfigError) -> BookshelfError {
    BookshelfError::Configuration(err.to_string())
}
