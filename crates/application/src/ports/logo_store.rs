//! Logo storage port

use async_trait::async_trait;
use domain::{entities::Logo, value_objects::ImagePayload};

use crate::error::ApplicationError;

/// Port for the singleton site logo
#[async_trait]
pub trait LogoStore: Send + Sync {
    /// Get the logo, `None` when nothing has been uploaded yet
    async fn get(&self) -> Result<Option<Logo>, ApplicationError>;

    /// Replace the logo image
    async fn upsert(&self, image: &ImagePayload) -> Result<(), ApplicationError>;
}
