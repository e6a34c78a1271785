//! Persistence module
//!
//! SQLite-based storage for risk points, the banner and logo singletons,
//! and news articles.

pub mod banner_store;
pub mod connection;
pub mod logo_store;
pub mod migrations;
pub mod news_store;
pub mod point_store;
pub mod seed;

pub use banner_store::SqliteBannerStore;
pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use logo_store::SqliteLogoStore;
pub use news_store::SqliteNewsStore;
pub use point_store::SqlitePointStore;

use application::error::ApplicationError;
use domain::value_objects::{DEFAULT_MIME_TYPE, ImagePayload};

/// Map a SQLite error to an application error
///
/// CHECK and NOT NULL violations become `Constraint` so the HTTP layer can
/// answer 400 instead of 500; everything else is internal.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> ApplicationError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ApplicationError::Constraint(e.to_string())
        }
        _ => ApplicationError::Internal(e.to_string()),
    }
}

/// Reassemble an image payload from its BLOB and MIME columns
pub(crate) fn image_from_columns(
    data: Option<Vec<u8>>,
    mime_type: Option<String>,
) -> Option<ImagePayload> {
    data.map(|bytes| {
        ImagePayload::from_parts(
            bytes,
            mime_type.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        )
    })
}
