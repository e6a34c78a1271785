//! SQLite banner store implementation
//!
//! The banner is a singleton row with id pinned to 1. Reads fall back to the
//! default placeholder when nothing has been stored yet.

use std::sync::Arc;

use application::{error::ApplicationError, ports::BannerStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{entities::Banner, value_objects::ImagePayload};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::{image_from_columns, map_sqlite_err};

/// SQLite-based banner store
#[derive(Debug, Clone)]
pub struct SqliteBannerStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteBannerStore {
    /// Create a new SQLite banner store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BannerStore for SqliteBannerStore {
    #[instrument(skip(self))]
    async fn get(&self) -> Result<Banner, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let banner = conn
                .query_row(
                    "SELECT image_data, mime_type, caption, updated_at FROM banner WHERE id = 1",
                    [],
                    row_to_banner,
                )
                .optional()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            Ok(banner.unwrap_or_else(Banner::default_placeholder))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, image, caption))]
    async fn upsert(
        &self,
        image: Option<&ImagePayload>,
        caption: Option<&str>,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let image = image.cloned();
        let caption = caption.map(str::to_string);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let (image_data, mime_type) = match image {
                Some(payload) => {
                    let (bytes, mime) = payload.into_parts();
                    (Some(bytes), Some(mime))
                }
                None => (None, None),
            };

            // Absent fields keep their stored value
            conn.execute(
                "INSERT INTO banner (id, image_data, mime_type, caption, updated_at)
                 VALUES (1, ?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    image_data = COALESCE(excluded.image_data, banner.image_data),
                    mime_type = COALESCE(excluded.mime_type, banner.mime_type),
                    caption = COALESCE(excluded.caption, banner.caption),
                    updated_at = excluded.updated_at",
                params![image_data, mime_type, caption, Utc::now().to_rfc3339()],
            )
            .map_err(map_sqlite_err)?;

            debug!("Upserted banner");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

fn row_to_banner(row: &Row<'_>) -> rusqlite::Result<Banner> {
    let image_data: Option<Vec<u8>> = row.get(0)?;
    let mime_type: Option<String> = row.get(1)?;
    let caption: Option<String> = row.get(2)?;
    let updated_at_str: String = row.get(3)?;

    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(Banner {
        image: image_from_columns(image_data, mime_type),
        caption,
        updated_at,
    })
}
