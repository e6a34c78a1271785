//! SQLite logo store implementation
//!
//! The logo is a singleton row with id pinned to 1. Unlike the banner there
//! is no placeholder; reads return `None` until an upload happens.

use std::sync::Arc;

use application::{error::ApplicationError, ports::LogoStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{entities::Logo, value_objects::ImagePayload};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::{image_from_columns, map_sqlite_err};

/// SQLite-based logo store
#[derive(Debug, Clone)]
pub struct SqliteLogoStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteLogoStore {
    /// Create a new SQLite logo store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogoStore for SqliteLogoStore {
    #[instrument(skip(self))]
    async fn get(&self) -> Result<Option<Logo>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                "SELECT image_data, mime_type, updated_at FROM logo WHERE id = 1",
                [],
                row_to_logo,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, image))]
    async fn upsert(&self, image: &ImagePayload) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let (bytes, mime) = image.clone().into_parts();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                "INSERT INTO logo (id, image_data, mime_type, updated_at)
                 VALUES (1, ?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    image_data = excluded.image_data,
                    mime_type = excluded.mime_type,
                    updated_at = excluded.updated_at",
                params![bytes, mime, Utc::now().to_rfc3339()],
            )
            .map_err(map_sqlite_err)?;

            debug!("Upserted logo");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

fn row_to_logo(row: &Row<'_>) -> rusqlite::Result<Logo> {
    let image_data: Option<Vec<u8>> = row.get(0)?;
    let mime_type: Option<String> = row.get(1)?;
    let updated_at_str: String = row.get(2)?;

    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(Logo {
        image: image_from_columns(image_data, mime_type),
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::persistence::create_pool;

    fn test_store() -> SqliteLogoStore {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
            seed_sample_data: false,
        };
        let pool = create_pool(&config).unwrap();
        SqliteLogoStore::new(Arc::new(pool))
    }

    #[tokio::test]
    async fn get_without_upload_returns_none() {
        let store = test_store();
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let store = test_store();
        let image = ImagePayload::from_parts(vec![1, 2, 3], "image/webp".to_string());
        store.upsert(&image).await.unwrap();

        let logo = store.get().await.unwrap().unwrap();
        let stored = logo.image.unwrap();
        assert_eq!(stored.mime_type(), "image/webp");
        assert_eq!(stored.bytes(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn second_upsert_replaces_image() {
        let store = test_store();
        store
            .upsert(&ImagePayload::from_parts(vec![1], "image/png".to_string()))
            .await
            .unwrap();
        store
            .upsert(&ImagePayload::from_parts(vec![2, 2], "image/gif".to_string()))
            .await
            .unwrap();

        let logo = store.get().await.unwrap().unwrap();
        let stored = logo.image.unwrap();
        assert_eq!(stored.mime_type(), "image/gif");
        assert_eq!(stored.bytes(), &[2, 2]);
    }
}
