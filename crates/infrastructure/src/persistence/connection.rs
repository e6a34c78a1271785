//! Database connection management
//!
//! Provides SQLite connection pooling via r2d2.

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Seed error: {0}")]
    Seed(String),
}

/// SQLite connection pool type alias
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Pooled connection type alias
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a new connection pool
///
/// Runs migrations and, when enabled, inserts the sample data into empty
/// tables.
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    info!(path = %config.path, max_connections = config.max_connections, "Creating database connection pool");

    let manager = if config.path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        // Create parent directories if they don't exist
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Migration(format!("Failed to create database directory: {e}"))
                })?;
            }
        }
        SqliteConnectionManager::file(&config.path)
    };

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)?;

    // Initialize the database
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }

    if config.run_migrations {
        let conn = pool.get()?;
        crate::persistence::migrations::run_migrations(&conn)?;
    }

    if config.seed_sample_data {
        let mut conn = pool.get()?;
        crate::persistence::seed::seed_sample_data(&mut conn)?;
    }

    debug!("Database connection pool created successfully");
    Ok(pool)
}

/// Initialize database with basic settings
fn initialize_database(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
            seed_sample_data: false,
        }
    }

    #[test]
    fn create_in_memory_pool() {
        let pool = create_pool(&memory_config());
        assert!(pool.is_ok());
    }

    #[test]
    fn pool_connection_works() {
        let pool = create_pool(&memory_config()).unwrap();
        let conn = pool.get();
        assert!(conn.is_ok());
    }

    #[test]
    fn create_pool_with_seeding() {
        let config = DatabaseConfig {
            seed_sample_data: true,
            ..memory_config()
        };
        let pool = create_pool(&config).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))
            .unwrap();
        assert!(count > 0);
    }

    #[test]
    fn seeding_is_idempotent_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("rawanmap.db").to_string_lossy().into_owned(),
            max_connections: 1,
            run_migrations: true,
            seed_sample_data: true,
        };

        fn counts(pool: &ConnectionPool) -> (i64, i64) {
            let conn = pool.get().unwrap();
            let points = conn
                .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))
                .unwrap();
            let banner = conn
                .query_row("SELECT COUNT(*) FROM banner", [], |row| row.get(0))
                .unwrap();
            (points, banner)
        }

        let pool = create_pool(&config).unwrap();
        assert_eq!(counts(&pool), (5, 1));
        drop(pool);

        // Reopening the same file must not duplicate the sample rows
        let reopened = create_pool(&config).unwrap();
        assert_eq!(counts(&reopened), (5, 1));
    }

    #[test]
    fn database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "rawanmap.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn database_error_display() {
        let err = DatabaseError::Migration("bad schema".to_string());
        assert!(err.to_string().contains("bad schema"));
    }
}
