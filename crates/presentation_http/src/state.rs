//! Application state shared across handlers

use std::sync::Arc;

use application::ports::{BannerStore, LogoStore, NewsStore, PointStore};
use infrastructure::{
    AppConfig, ConnectionPool, SqliteBannerStore, SqliteLogoStore, SqliteNewsStore,
    SqlitePointStore,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Risk point storage
    pub points: Arc<dyn PointStore>,
    /// Banner singleton storage
    pub banner: Arc<dyn BannerStore>,
    /// Logo singleton storage
    pub logo: Arc<dyn LogoStore>,
    /// News article storage
    pub news: Arc<dyn NewsStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire all SQLite stores onto a shared connection pool
    #[must_use]
    pub fn from_pool(pool: Arc<ConnectionPool>, config: Arc<AppConfig>) -> Self {
        Self {
            points: Arc::new(SqlitePointStore::new(Arc::clone(&pool))),
            banner: Arc::new(SqliteBannerStore::new(Arc::clone(&pool))),
            logo: Arc::new(SqliteLogoStore::new(Arc::clone(&pool))),
            news: Arc::new(SqliteNewsStore::new(pool)),
            config,
        }
    }
}
