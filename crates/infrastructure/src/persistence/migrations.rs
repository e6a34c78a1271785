//! Database migrations
//!
//! Manages database schema versioning and migrations.
//!
//! ## Rollback Strategy
//!
//! Rollbacks are manual - if a migration fails:
//! 1. Check the error message for details
//! 2. Fix the underlying issue
//! 3. Manually repair the database if needed
//! 4. Re-run migrations
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION` constant
//! 2. Add a new `migrate_vX` function
//! 3. Update `run_migrations` to call the new function

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (initial schema) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations complete");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

/// Get current schema version
fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    // Create schema_version table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: Initial schema
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: Initial schema");

    conn.execute_batch(
        "
        -- Risk points table
        CREATE TABLE IF NOT EXISTS points (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            category TEXT NOT NULL CHECK(category IN ('low', 'medium', 'high')),
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Singleton banner row, id pinned to 1
        CREATE TABLE IF NOT EXISTS banner (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            image_data BLOB,
            mime_type TEXT,
            caption TEXT,
            updated_at TEXT NOT NULL
        );

        -- Singleton logo row, id pinned to 1
        CREATE TABLE IF NOT EXISTS logo (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            image_data BLOB,
            mime_type TEXT,
            updated_at TEXT NOT NULL
        );

        -- News articles table
        CREATE TABLE IF NOT EXISTS news (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            image_data BLOB,
            mime_type TEXT,
            author TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_points_category ON points(category);
        CREATE INDEX IF NOT EXISTS idx_news_created ON news(created_at);
        ",
    )?;

    Ok(())
}
