//! Singleton site assets: the homepage banner and the site logo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ImagePayload;

/// Caption shown when no banner has been configured yet
pub const DEFAULT_BANNER_CAPTION: &str = "Informasi Area Rawan Narkoba - Kota Tanjungpinang";

/// The single homepage banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Stored image, absent until an admin uploads one
    pub image: Option<ImagePayload>,
    /// Caption text shown with the banner
    pub caption: Option<String>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Banner {
    /// Banner state before any admin upload
    #[must_use]
    pub fn default_placeholder() -> Self {
        Self {
            image: None,
            caption: Some(DEFAULT_BANNER_CAPTION.to_string()),
            updated_at: Utc::now(),
        }
    }
}

/// The single site logo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    /// Stored image, absent until an admin uploads one
    pub image: Option<ImagePayload>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_placeholder_has_caption_no_image() {
        let banner = Banner::default_placeholder();
        assert!(banner.image.is_none());
        assert_eq!(banner.caption.as_deref(), Some(DEFAULT_BANNER_CAPTION));
    }

    #[test]
    fn banner_serialization() {
        let banner = Banner::default_placeholder();
        let json = serde_json::to_string(&banner).unwrap();
        assert!(json.contains("caption"));
        assert!(json.contains("Tanjungpinang"));
    }
}
