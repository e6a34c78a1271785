//! Site logo handlers
//!
//! Same singleton shape as the banner, without a caption. Uploading
//! always requires an image.

use axum::{Json, extract::State, response::Response};
use chrono::{DateTime, Utc};
use domain::{entities::Logo, value_objects::ImagePayload};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::ApiError, handlers::image_response, middleware::ValidatedJson, state::AppState};

// ---------------------------------------------------------------------------
// Response / request DTOs
// ---------------------------------------------------------------------------

/// Logo metadata (image bytes are served separately)
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "has_image": true,
    "mime_type": "image/png",
    "updated_at": "2024-06-01T08:00:00Z"
}))]
pub struct LogoResponse {
    /// Whether an image is stored
    pub has_image: bool,
    /// MIME type of the stored image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Logo> for LogoResponse {
    fn from(logo: Logo) -> Self {
        Self {
            has_image: logo.image.is_some(),
            mime_type: logo
                .image
                .as_ref()
                .map(|image| image.mime_type().to_string()),
            updated_at: logo.updated_at,
        }
    }
}

/// Logo upload request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"image_data": "data:image/png;base64,iVBORw0KGgo="}))]
pub struct UpdateLogoRequest {
    /// Image as a data URL or bare base64
    pub image_data: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Get logo metadata
///
/// GET /api/logo
#[utoipa::path(
    get,
    path = "/api/logo",
    tag = "logo",
    responses(
        (status = 200, description = "Logo metadata", body = LogoResponse),
        (status = 404, description = "No logo uploaded yet", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_logo(State(state): State<AppState>) -> Result<Json<LogoResponse>, ApiError> {
    let logo = state
        .logo
        .get()
        .await?
        .ok_or_else(|| ApiError::NotFound("No logo uploaded yet".to_string()))?;
    Ok(Json(logo.into()))
}

/// Get the logo image bytes
///
/// GET /api/logo/image
#[utoipa::path(
    get,
    path = "/api/logo/image",
    tag = "logo",
    responses(
        (status = 200, description = "Raw image bytes", content_type = "image/*"),
        (status = 404, description = "No image stored", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_logo_image(State(state): State<AppState>) -> Result<Response, ApiError> {
    let logo = state.logo.get().await?;
    image_response(logo.and_then(|l| l.image))
}

/// Upload the logo
///
/// POST /api/logo
#[utoipa::path(
    post,
    path = "/api/logo",
    tag = "logo",
    request_body = UpdateLogoRequest,
    responses(
        (status = 200, description = "Updated logo metadata", body = LogoResponse),
        (status = 400, description = "Invalid image data", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, req))]
pub async fn update_logo(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateLogoRequest>,
) -> Result<Json<LogoResponse>, ApiError> {
    let image =
        ImagePayload::parse(&req.image_data).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.logo.upsert(&image).await?;
    debug!(bytes = image.len(), mime = image.mime_type(), "Updated logo");

    let logo = state
        .logo
        .get()
        .await?
        .ok_or_else(|| ApiError::Internal("Logo missing after upsert".to_string()))?;
    Ok(Json(logo.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_reports_stored_mime_type() {
        let logo = Logo {
            image: Some(ImagePayload::from_parts(
                vec![0x89, 0x50],
                "image/png".to_string(),
            )),
            updated_at: Utc::now(),
        };
        let resp = LogoResponse::from(logo);
        assert!(resp.has_image);
        assert_eq!(resp.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn upload_request_requires_image_data() {
        assert!(serde_json::from_str::<UpdateLogoRequest>("{}").is_err());
    }
}
