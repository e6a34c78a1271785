//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the SQLite persistence adapters and application configuration.

pub mod config;
pub mod persistence;

pub use config::{AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteBannerStore, SqliteLogoStore, SqliteNewsStore,
    SqlitePointStore, create_pool,
};
