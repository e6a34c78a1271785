//! News articles published on the public site

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ImagePayload;

/// A published news article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Database-assigned identifier
    pub id: i64,
    /// Headline
    pub title: String,
    /// Article body
    pub content: String,
    /// Optional cover image
    pub image: Option<ImagePayload>,
    /// Author display name
    pub author: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
