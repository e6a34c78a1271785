//! Decoded image payload value object
//!
//! Uploads arrive as base64 strings, either bare or wrapped in a
//! `data:<mime>;base64,` URL. Both forms normalize to raw bytes plus a
//! MIME type here, so stores and handlers never deal with encodings.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Maximum accepted decoded image size (50 MB)
pub const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

/// MIME types accepted for uploaded images
const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/svg+xml",
    "image/webp",
];

/// Fallback MIME type for bare base64 uploads without a data URL prefix,
/// and for stored images whose MIME column is NULL
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// An image as stored and served: raw bytes plus MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImagePayload {
    /// Construct from already-decoded bytes (trusted source, e.g. the database)
    #[must_use]
    pub const fn from_parts(bytes: Vec<u8>, mime_type: String) -> Self {
        Self { bytes, mime_type }
    }

    /// Parse a base64 upload string into a decoded payload
    ///
    /// Accepts `data:image/png;base64,...` style data URLs as well as bare
    /// base64, which defaults to `image/png`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidImage` when the MIME type is not in the
    /// allowlist, the base64 is undecodable, or the decoded size exceeds
    /// [`MAX_IMAGE_BYTES`].
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let (mime_type, encoded) = match split_data_url(input) {
            Some((mime, data)) => (mime, data),
            None => (DEFAULT_MIME_TYPE, input),
        };

        if !ALLOWED_MIME_TYPES.contains(&mime_type) {
            return Err(DomainError::InvalidImage(format!(
                "unsupported image type: {mime_type}"
            )));
        }

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| DomainError::InvalidImage(format!("invalid base64: {e}")))?;

        if bytes.is_empty() {
            return Err(DomainError::InvalidImage("empty image data".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::InvalidImage(format!(
                "image exceeds maximum size of {MAX_IMAGE_BYTES} bytes"
            )));
        }

        Ok(Self {
            bytes,
            mime_type: mime_type.to_string(),
        })
    }

    /// Raw decoded bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, e.g. `image/png`
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decompose into bytes and MIME type
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.bytes, self.mime_type)
    }

    /// Decoded size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Split a `data:<mime>;base64,<data>` URL into its MIME type and payload
fn split_data_url(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix("data:")?;
    let (mime, data) = rest.split_once(";base64,")?;
    Some((mime, data))
}
