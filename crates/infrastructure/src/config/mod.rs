//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `security`: Admin credentials and rate limiting
//! - `database`: SQLite database settings

mod database;
mod security;
mod server;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use database::DatabaseConfig;
pub use security::SecurityConfig;
pub use server::ServerConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Controls error detail exposure and default-credential warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - verbose errors, relaxed warnings
    #[default]
    Development,
    /// Production environment - sanitized errors, strict validation
    Production,
}

impl Environment {
    /// Whether internal error details may be exposed in responses
    #[must_use]
    pub const fn expose_errors(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// Environment variables use a double underscore between nesting levels,
    /// e.g. `RAWANMAP_SERVER__PORT` or `RAWANMAP_SECURITY__ADMIN_PASSWORD`.
    /// A single separator would split multi-word field names like
    /// `admin_password` into bogus nesting and the override would be
    /// silently dropped.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(Self::env_source())
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("RAWANMAP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(env: config::Environment) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "rawanmap.db")?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables
            .add_source(env);

        let config = builder.build()?;
        config.try_deserialize()
    }
}
