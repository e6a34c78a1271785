//! Homepage banner handlers
//!
//! The banner is a singleton: public metadata and image reads, one
//! authenticated update endpoint.

use application::escape_html;
use axum::{Json, extract::State, response::Response};
use chrono::{DateTime, Utc};
use domain::{entities::Banner, value_objects::ImagePayload};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::ApiError, handlers::image_response, middleware::ValidatedJson, state::AppState};

// ---------------------------------------------------------------------------
// Response / request DTOs
// ---------------------------------------------------------------------------

/// Banner metadata (image bytes are served separately)
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "caption": "Informasi Area Rawan Narkoba - Kota Tanjungpinang",
    "has_image": true,
    "mime_type": "image/jpeg",
    "updated_at": "2024-06-01T08:00:00Z"
}))]
pub struct BannerResponse {
    /// Banner caption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Whether an image is stored
    pub has_image: bool,
    /// MIME type of the stored image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Banner> for BannerResponse {
    fn from(banner: Banner) -> Self {
        Self {
            caption: banner.caption,
            has_image: banner.image.is_some(),
            mime_type: banner
                .image
                .as_ref()
                .map(|image| image.mime_type().to_string()),
            updated_at: banner.updated_at,
        }
    }
}

/// Banner update request body
///
/// Both fields are optional but at least one must be present. An absent
/// image preserves the stored one, so a caption-only update never wipes
/// the uploaded picture.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"caption": "Stay alert, report anonymously"}))]
pub struct UpdateBannerRequest {
    /// Image as a data URL or bare base64
    #[serde(default)]
    pub image_data: Option<String>,
    /// New caption
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    #[serde(default)]
    pub caption: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Get banner metadata
///
/// GET /api/banner
#[utoipa::path(
    get,
    path = "/api/banner",
    tag = "banner",
    responses(
        (status = 200, description = "Banner metadata", body = BannerResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_banner(State(state): State<AppState>) -> Result<Json<BannerResponse>, ApiError> {
    let banner = state.banner.get().await?;
    Ok(Json(banner.into()))
}

/// Get the banner image bytes
///
/// GET /api/banner/image
#[utoipa::path(
    get,
    path = "/api/banner/image",
    tag = "banner",
    responses(
        (status = 200, description = "Raw image bytes", content_type = "image/*"),
        (status = 404, description = "No image stored", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_banner_image(State(state): State<AppState>) -> Result<Response, ApiError> {
    let banner = state.banner.get().await?;
    image_response(banner.image)
}

/// Update the banner
///
/// POST /api/banner
#[utoipa::path(
    post,
    path = "/api/banner",
    tag = "banner",
    request_body = UpdateBannerRequest,
    responses(
        (status = 200, description = "Updated banner metadata", body = BannerResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, req))]
pub async fn update_banner(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateBannerRequest>,
) -> Result<Json<BannerResponse>, ApiError> {
    if req.image_data.is_none() && req.caption.is_none() {
        return Err(ApiError::BadRequest(
            "Provide image_data, caption, or both".to_string(),
        ));
    }

    let image = req
        .image_data
        .as_deref()
        .map(ImagePayload::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let caption = req.caption.as_deref().map(escape_html);

    state
        .banner
        .upsert(image.as_ref(), caption.as_deref())
        .await?;
    debug!(
        image_replaced = image.is_some(),
        caption_changed = caption.is_some(),
        "Updated banner"
    );

    let banner = state.banner.get().await?;
    Ok(Json(banner.into()))
}
