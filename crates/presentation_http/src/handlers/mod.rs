//! HTTP request handlers

pub mod banner;
pub mod health;
pub mod logo;
pub mod news;
pub mod points;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::value_objects::ImagePayload;

use crate::error::ApiError;

/// Serve stored image bytes with caching headers
///
/// Browsers cache map assets for an hour; a re-upload changes the payload
/// at the same URL, so the TTL is kept short.
pub(crate) fn image_response(image: Option<ImagePayload>) -> Result<Response, ApiError> {
    let image = image.ok_or_else(|| ApiError::NotFound("No image stored".to_string()))?;
    let (bytes, mime_type) = image.into_parts();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=3600".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}
