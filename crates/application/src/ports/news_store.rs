//! News article storage port

use async_trait::async_trait;
use domain::{entities::NewsArticle, value_objects::ImagePayload};

use crate::error::ApplicationError;

/// Data for an article to be created
#[derive(Debug, Clone)]
pub struct NewArticle {
    /// Headline (already sanitized)
    pub title: String,
    /// Article body, stored verbatim
    pub content: String,
    /// Optional cover image
    pub image: Option<ImagePayload>,
    /// Author display name (already sanitized)
    pub author: String,
}

/// Full-row update for an existing article
///
/// Text fields always replace the stored values. A `None` image preserves
/// the currently stored image bytes and MIME type.
#[derive(Debug, Clone)]
pub struct NewsUpdate {
    /// New headline
    pub title: String,
    /// New body
    pub content: String,
    /// New cover image, `None` keeps the stored one
    pub image: Option<ImagePayload>,
    /// New author display name
    pub author: String,
}

/// Port for news article storage operations
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// List all articles, newest first
    async fn list(&self) -> Result<Vec<NewsArticle>, ApplicationError>;

    /// Get an article by ID
    async fn get(&self, id: i64) -> Result<Option<NewsArticle>, ApplicationError>;

    /// Case-insensitive substring search over title, content, and author,
    /// newest first
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, ApplicationError>;

    /// Create an article, returning the stored row with its assigned ID
    async fn create(&self, article: NewArticle) -> Result<NewsArticle, ApplicationError>;

    /// Replace an article's fields, preserving the image when absent
    ///
    /// Returns `None` when no article with the given ID exists.
    async fn update(
        &self,
        id: i64,
        update: &NewsUpdate,
    ) -> Result<Option<NewsArticle>, ApplicationError>;

    /// Delete an article, returning the number of rows removed (0 or 1)
    async fn delete(&self, id: i64) -> Result<u64, ApplicationError>;

    /// Count stored articles (health probe)
    async fn count(&self) -> Result<u64, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn NewsStore) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn NewsStore>();
    }
}
