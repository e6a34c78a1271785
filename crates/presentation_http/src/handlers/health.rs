//! Health check handler

use axum::{Json, extract::State, http::StatusCode, response::{IntoResponse, Response}};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when storage is reachable
    pub status: String,
    /// Server version
    pub version: String,
    /// Number of stored risk points
    pub points: u64,
    /// Number of stored news articles
    pub news: u64,
}

/// Storage reachability probe
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Storage reachable", body = HealthResponse),
        (status = 500, description = "Storage unreachable")
    )
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    match (state.points.count().await, state.news.count().await) {
        (Ok(points), Ok(news)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                points,
                news,
            }),
        )
            .into_response(),
        (points, news) => {
            if let Err(e) = points.and(news) {
                error!(error = %e, "Health check failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serialization() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.3.1".to_string(),
            points: 5,
            news: 0,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"points\":5"));
    }

    #[test]
    fn health_response_deserialization() {
        let json = r#"{"status":"ok","version":"0.3.1","points":5,"news":2}"#;
        let resp: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.news, 2);
    }
}
