//! SQLite risk point store implementation
//!
//! Implements the PointStore port using SQLite.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{NewPoint, PointStore, PointUpdate},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    entities::{Point, RiskCategory},
    value_objects::GeoLocation,
};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::map_sqlite_err;

/// SQLite-based risk point store
#[derive(Debug, Clone)]
pub struct SqlitePointStore {
    pool: Arc<ConnectionPool>,
}

impl SqlitePointStore {
    /// Create a new SQLite point store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, name, lat, lng, category, description, created_at, updated_at";

#[async_trait]
impl PointStore for SqlitePointStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Point>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM points ORDER BY created_at DESC, id DESC"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let points: Vec<Point> = stmt
                .query_map([], row_to_point)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .filter_map(Result::ok)
                .collect();

            Ok(points)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Option<Point>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM points WHERE id = ?1"),
                [id],
                row_to_point,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, point), fields(name = %point.name))]
    async fn create(&self, point: NewPoint) -> Result<Point, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let now = Utc::now();
            conn.execute(
                "INSERT INTO points (name, lat, lng, category, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    point.name,
                    point.location.latitude(),
                    point.location.longitude(),
                    point.category.as_str(),
                    point.description,
                    now.to_rfc3339(),
                ],
            )
            .map_err(map_sqlite_err)?;

            let id = conn.last_insert_rowid();
            debug!(id, "Created risk point");

            Ok(Point {
                id,
                name: point.name,
                location: point.location,
                category: point.category,
                description: point.description,
                created_at: now,
                updated_at: now,
            })
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: i64,
        update: &PointUpdate,
    ) -> Result<Option<Point>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let update = update.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            // NULL parameters fall through to the stored column value
            let affected = conn
                .execute(
                    "UPDATE points SET
                        name = COALESCE(?1, name),
                        lat = COALESCE(?2, lat),
                        lng = COALESCE(?3, lng),
                        category = COALESCE(?4, category),
                        description = COALESCE(?5, description),
                        updated_at = ?6
                     WHERE id = ?7",
                    params![
                        update.name,
                        update.lat,
                        update.lng,
                        update.category.map(|c| c.as_str()),
                        update.description,
                        Utc::now().to_rfc3339(),
                        id,
                    ],
                )
                .map_err(map_sqlite_err)?;

            if affected == 0 {
                return Ok(None);
            }

            debug!(id, "Updated risk point");
            conn.query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM points WHERE id = ?1"),
                [id],
                row_to_point,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<u64, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let removed = conn
                .execute("DELETE FROM points WHERE id = ?1", [id])
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(id, removed, "Deleted risk point");
            Ok(removed as u64)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            Ok(count.unsigned_abs())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

fn row_to_point(row: &Row<'_>) -> rusqlite::Result<Point> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let lat: f64 = row.get(2)?;
    let lng: f64 = row.get(3)?;
    let category_str: String = row.get(4)?;
    let description: Option<String> = row.get(5)?;
    let created_at_str: String = row.get(6)?;
    let updated_at_str: String = row.get(7)?;

    // Coordinates and category were validated on the way in
    let location = GeoLocation::new_unchecked(lat, lng);
    let category = RiskCategory::parse(&category_str).unwrap_or(RiskCategory::Medium);
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(Point {
        id,
        name,
        location,
        category,
        description,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::persistence::create_pool;

    fn test_store() -> SqlitePointStore {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
            seed_sample_data: false,
        };
        let pool = create_pool(&config).unwrap();
        SqlitePointStore::new(Arc::new(pool))
    }

    fn sample_point() -> NewPoint {
        NewPoint {
            name: "Batu IX".to_string(),
            location: GeoLocation::new(0.9167, 104.4510).unwrap(),
            category: RiskCategory::Medium,
            description: Some("Near the market".to_string()),
        }
    }

    #[tokio::test]
    async fn create_and_get_point() {
        let store = test_store();
        let created = store.create(sample_point()).await.unwrap();
        assert!(created.id > 0);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Batu IX");
        assert_eq!(fetched.category, RiskCategory::Medium);
        assert!((fetched.location.latitude() - 0.9167).abs() < 1e-9);
    }

    #[tokio::test]
    async fn get_missing_point_returns_none() {
        let store = test_store();
        assert!(store.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = test_store();
        store.create(sample_point()).await.unwrap();
        let mut second = sample_point();
        second.name = "Dompak".to_string();
        store.create(second).await.unwrap();

        let points = store.list().await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "Dompak");
        assert_eq!(points[1].name, "Batu IX");
    }

    #[tokio::test]
    async fn partial_update_preserves_other_fields() {
        let store = test_store();
        let created = store.create(sample_point()).await.unwrap();

        let update = PointUpdate {
            category: Some(RiskCategory::High),
            ..Default::default()
        };
        let updated = store.update(created.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.category, RiskCategory::High);
        assert_eq!(updated.name, "Batu IX");
        assert_eq!(updated.description.as_deref(), Some("Near the market"));
    }

    #[tokio::test]
    async fn update_missing_point_returns_none() {
        let store = test_store();
        let update = PointUpdate {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(store.update(42, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_touches_updated_at() {
        let store = test_store();
        let created = store.create(sample_point()).await.unwrap();

        let update = PointUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id, &update).await.unwrap().unwrap();
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn delete_reports_removed_count() {
        let store = test_store();
        let created = store.create(sample_point()).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), 1);
        assert_eq!(store.delete(created.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let store = test_store();
        assert_eq!(store.count().await.unwrap(), 0);
        store.create(sample_point()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
