//! Banner storage port

use async_trait::async_trait;
use domain::{entities::Banner, value_objects::ImagePayload};

use crate::error::ApplicationError;

/// Port for the singleton homepage banner
#[async_trait]
pub trait BannerStore: Send + Sync {
    /// Get the banner, falling back to the default placeholder when no row exists
    async fn get(&self) -> Result<Banner, ApplicationError>;

    /// Update the banner
    ///
    /// A `None` image preserves the currently stored image bytes and MIME
    /// type; only the caption changes.
    async fn upsert(
        &self,
        image: Option<&ImagePayload>,
        caption: Option<&str>,
    ) -> Result<(), ApplicationError>;
}
