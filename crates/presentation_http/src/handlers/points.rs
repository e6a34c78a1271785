//! Risk point handlers
//!
//! Public reads and authenticated CRUD for the map markers.

use application::{
    escape_html,
    ports::{NewPoint, PointUpdate},
};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use domain::{
    entities::{Point, RiskCategory},
    value_objects::GeoLocation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

// ---------------------------------------------------------------------------
// Response / request DTOs
// ---------------------------------------------------------------------------

/// Risk point as returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Batu IX",
    "lat": 0.9167,
    "lng": 104.4510,
    "category": "medium",
    "description": "Monitored area",
    "created_at": "2024-06-01T08:00:00Z",
    "updated_at": "2024-06-01T08:00:00Z"
}))]
pub struct PointResponse {
    /// Point ID
    pub id: i64,
    /// Area name
    pub name: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Risk category: low, medium, or high
    #[schema(value_type = String)]
    pub category: RiskCategory,
    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Point> for PointResponse {
    fn from(point: Point) -> Self {
        Self {
            id: point.id,
            name: point.name,
            lat: point.location.latitude(),
            lng: point.location.longitude(),
            category: point.category,
            description: point.description,
            created_at: point.created_at,
            updated_at: point.updated_at,
        }
    }
}

/// Create point request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Kampung Bugis",
    "lat": 0.9100,
    "lng": 104.4600,
    "category": "high",
    "description": "Reported activity near the harbor"
}))]
pub struct CreatePointRequest {
    /// Area name
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    /// Latitude
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub lat: f64,
    /// Longitude
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub lng: f64,
    /// Risk category: low, medium, or high (legacy rendah/sedang/tinggi accepted)
    #[schema(value_type = String)]
    pub category: RiskCategory,
    /// Optional free-text description
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update request body
///
/// An absent field keeps the stored value, and an explicit JSON `null` is
/// treated the same way. Clearing a description is done by sending an
/// empty string, not `null`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"category": "low"}))]
pub struct UpdatePointRequest {
    /// New area name
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    #[serde(default)]
    pub name: Option<String>,
    /// New latitude
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    #[serde(default)]
    pub lat: Option<f64>,
    /// New longitude
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    #[serde(default)]
    pub lng: Option<f64>,
    /// New risk category
    #[schema(value_type = Option<String>)]
    #[serde(default)]
    pub category: Option<RiskCategory>,
    /// New description
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Deletion outcome
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({"ok": true, "removed": 1}))]
pub struct DeleteResponse {
    /// Always true when the request was processed
    pub ok: bool,
    /// Number of rows removed (0 when the ID did not exist)
    pub removed: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List all risk points, newest first
///
/// GET /api/points
#[utoipa::path(
    get,
    path = "/api/points",
    tag = "points",
    responses(
        (status = 200, description = "All risk points", body = Vec<PointResponse>)
    )
)]
#[instrument(skip(state))]
pub async fn list_points(
    State(state): State<AppState>,
) -> Result<Json<Vec<PointResponse>>, ApiError> {
    let points = state.points.list().await?;
    let response: Vec<PointResponse> = points.into_iter().map(Into::into).collect();
    debug!(count = response.len(), "Listed risk points");
    Ok(Json(response))
}

/// Get a single risk point
///
/// GET /api/points/:id
#[utoipa::path(
    get,
    path = "/api/points/{id}",
    tag = "points",
    params(("id" = i64, Path, description = "Point ID")),
    responses(
        (status = 200, description = "The risk point", body = PointResponse),
        (status = 404, description = "No such point", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PointResponse>, ApiError> {
    let point = state
        .points
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Point {id} not found")))?;
    Ok(Json(point.into()))
}

/// Create a risk point
///
/// POST /api/points
#[utoipa::path(
    post,
    path = "/api/points",
    tag = "points",
    request_body = CreatePointRequest,
    responses(
        (status = 200, description = "Created point", body = PointResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, req), fields(name = %req.name))]
pub async fn create_point(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePointRequest>,
) -> Result<Json<PointResponse>, ApiError> {
    let location = GeoLocation::new(req.lat, req.lng)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let point = state
        .points
        .create(NewPoint {
            name: escape_html(&req.name),
            location,
            category: req.category,
            description: req.description.as_deref().map(escape_html),
        })
        .await?;

    debug!(id = point.id, "Created risk point");
    Ok(Json(point.into()))
}

/// Partially update a risk point
///
/// PATCH /api/points/:id
#[utoipa::path(
    patch,
    path = "/api/points/{id}",
    tag = "points",
    params(("id" = i64, Path, description = "Point ID")),
    request_body = UpdatePointRequest,
    responses(
        (status = 200, description = "Updated point", body = PointResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "No such point", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, req))]
pub async fn update_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePointRequest>,
) -> Result<Json<PointResponse>, ApiError> {
    let update = PointUpdate {
        name: req.name.as_deref().map(escape_html),
        lat: req.lat,
        lng: req.lng,
        category: req.category,
        description: req.description.as_deref().map(escape_html),
    };

    if !update.has_changes() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let point = state
        .points
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Point {id} not found")))?;

    debug!(id, "Updated risk point");
    Ok(Json(point.into()))
}

/// Delete a risk point
///
/// DELETE /api/points/:id
#[utoipa::path(
    delete,
    path = "/api/points/{id}",
    tag = "points",
    params(("id" = i64, Path, description = "Point ID")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = state.points.delete(id).await?;
    debug!(id, removed, "Deleted risk point");
    Ok(Json(DeleteResponse { ok: true, removed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_response_from_entity() {
        let point = Point {
            id: 7,
            name: "Dompak".to_string(),
            location: GeoLocation::new_unchecked(0.93, 104.42),
            category: RiskCategory::High,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let resp = PointResponse::from(point);
        assert_eq!(resp.id, 7);
        assert!((resp.lat - 0.93).abs() < 1e-9);
        assert_eq!(resp.category, RiskCategory::High);
    }

    #[test]
    fn create_request_accepts_legacy_alias() {
        let json = r#"{"name":"Dompak","lat":0.93,"lng":104.42,"category":"sedang"}"#;
        let req: CreatePointRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.category, RiskCategory::Medium);
    }

    #[test]
    fn create_request_rejects_unknown_category() {
        let json = r#"{"name":"Dompak","lat":0.93,"lng":104.42,"category":"extreme"}"#;
        assert!(serde_json::from_str::<CreatePointRequest>(json).is_err());
    }

    #[test]
    fn create_request_validates_ranges() {
        let req = CreatePointRequest {
            name: "Dompak".to_string(),
            lat: 95.0,
            lng: 104.42,
            category: RiskCategory::Low,
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_request_all_absent_is_valid_json() {
        let req: UpdatePointRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(req.name.is_none());
    }

    #[test]
    fn update_request_null_field_means_keep() {
        let req: UpdatePointRequest =
            serde_json::from_str(r#"{"name":"Dompak","description":null}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Dompak"));
        assert!(req.description.is_none());
    }

    #[test]
    fn update_request_empty_description_clears() {
        let req: UpdatePointRequest = serde_json::from_str(r#"{"description":""}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.description.as_deref(), Some(""));
    }

    #[test]
    fn delete_response_serialization() {
        let json = serde_json::to_string(&DeleteResponse { ok: true, removed: 0 }).unwrap();
        assert_eq!(json, r#"{"ok":true,"removed":0}"#);
    }
}
