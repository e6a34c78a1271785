//! SQLite news store implementation
//!
//! Implements the NewsStore port using SQLite. Article listings and search
//! results come back newest first.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{NewArticle, NewsStore, NewsUpdate},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::entities::NewsArticle;
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::{image_from_columns, map_sqlite_err};

/// SQLite-based news store
#[derive(Debug, Clone)]
pub struct SqliteNewsStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteNewsStore {
    /// Create a new SQLite news store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "id, title, content, image_data, mime_type, author, created_at, updated_at";

#[async_trait]
impl NewsStore for SqliteNewsStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<NewsArticle>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM news ORDER BY created_at DESC, id DESC"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let articles: Vec<NewsArticle> = stmt
                .query_map([], row_to_article)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .filter_map(Result::ok)
                .collect();

            Ok(articles)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Option<NewsArticle>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM news WHERE id = ?1"),
                [id],
                row_to_article,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let pattern = format!("%{query}%");

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            // SQLite LIKE is case-insensitive for ASCII
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM news
                     WHERE title LIKE ?1 OR content LIKE ?1 OR author LIKE ?1
                     ORDER BY created_at DESC, id DESC"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let articles: Vec<NewsArticle> = stmt
                .query_map([&pattern], row_to_article)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .filter_map(Result::ok)
                .collect();

            Ok(articles)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, article), fields(title = %article.title))]
    async fn create(&self, article: NewArticle) -> Result<NewsArticle, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let (image_data, mime_type) = match &article.image {
                Some(payload) => (Some(payload.bytes().to_vec()), Some(payload.mime_type().to_string())),
                None => (None, None),
            };

            let now = Utc::now();
            conn.execute(
                "INSERT INTO news (title, content, image_data, mime_type, author, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    article.title,
                    article.content,
                    image_data,
                    mime_type,
                    article.author,
                    now.to_rfc3339(),
                ],
            )
            .map_err(map_sqlite_err)?;

            let id = conn.last_insert_rowid();
            debug!(id, "Created news article");

            Ok(NewsArticle {
                id,
                title: article.title,
                content: article.content,
                image: article.image,
                author: article.author,
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
        update: &NewsUpdate,
    ) -> Result<Option<NewsArticle>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let update = update.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let (image_data, mime_type) = match &update.image {
                Some(payload) => (Some(payload.bytes().to_vec()), Some(payload.mime_type().to_string())),
                None => (None, None),
            };

            // Text fields replace; an absent image keeps the stored one
            let affected = conn
                .execute(
                    "UPDATE news SET
                        title = ?1,
                        content = ?2,
                        author = ?3,
                        image_data = COALESCE(?4, image_data),
                        mime_type = COALESCE(?5, mime_type),
                        updated_at = ?6
                     WHERE id = ?7",
                    params![
                        update.title,
                        update.content,
                        update.author,
                        image_data,
                        mime_type,
                        Utc::now().to_rfc3339(),
                        id,
                    ],
                )
                .map_err(map_sqlite_err)?;

            if affected == 0 {
                return Ok(None);
            }

            debug!(id, "Updated news article");
            conn.query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM news WHERE id = ?1"),
                [id],
                row_to_article,
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
                .execute("DELETE FROM news WHERE id = ?1", [id])
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(id, removed, "Deleted news article");
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
                .query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            Ok(count.unsigned_abs())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<NewsArticle> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let content: String = row.get(2)?;
    let image_data: Option<Vec<u8>> = row.get(3)?;
    let mime_type: Option<String> = row.get(4)?;
    let author: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;
    let updated_at_str: String = row.get(7)?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(NewsArticle {
        id,
        title,
        content,
        image: image_from_columns(image_data, mime_type),
        author,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::persistence::create_pool;
    use domain::value_objects::ImagePayload;

    fn test_store() -> SqliteNewsStore {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
            seed_sample_data: false,
        };
        let pool = create_pool(&config).unwrap();
        SqliteNewsStore::new(Arc::new(pool))
    }

    fn sample_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            content: "Razia gabungan digelar di tiga titik.".to_string(),
            image: None,
            author: "Admin".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_article() {
        let store = test_store();
        let created = store.create(sample_article("Razia")).await.unwrap();
        assert!(created.id > 0);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Razia");
        assert_eq!(fetched.author, "Admin");
        assert!(fetched.image.is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let store = test_store();
        store.create(sample_article("Operasi Bersih")).await.unwrap();
        store.create(sample_article("Penyuluhan")).await.unwrap();

        let hits = store.search("operasi").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Operasi Bersih");
    }

    #[tokio::test]
    async fn search_matches_content_and_author() {
        let store = test_store();
        store.create(sample_article("Judul")).await.unwrap();

        assert_eq!(store.search("razia gabungan").await.unwrap().len(), 1);
        assert_eq!(store.search("admin").await.unwrap().len(), 1);
        assert!(store.search("tidak ada").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_text_preserves_image() {
        let store = test_store();
        let image = ImagePayload::from_parts(vec![9, 9], "image/png".to_string());
        let created = store
            .create(NewArticle {
                image: Some(image),
                ..sample_article("Original")
            })
            .await
            .unwrap();

        let update = NewsUpdate {
            title: "Revised".to_string(),
            content: "Updated body".to_string(),
            image: None,
            author: "Editor".to_string(),
        };
        let updated = store.update(created.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.title, "Revised");
        assert_eq!(updated.author, "Editor");
        assert!(updated.image.is_some());
    }

    #[tokio::test]
    async fn update_missing_article_returns_none() {
        let store = test_store();
        let update = NewsUpdate {
            title: "T".to_string(),
            content: "C".to_string(),
            image: None,
            author: "A".to_string(),
        };
        assert!(store.update(7, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_removed_count() {
        let store = test_store();
        let created = store.create(sample_article("Gone")).await.unwrap();
        assert_eq!(store.delete(created.id).await.unwrap(), 1);
        assert_eq!(store.delete(created.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_tracks_articles() {
        let store = test_store();
        assert_eq!(store.count().await.unwrap(), 0);
        store.create(sample_article("One")).await.unwrap();
        store.create(sample_article("Two")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
