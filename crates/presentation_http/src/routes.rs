//! Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use infrastructure::ServerConfig;
use tower_http::cors::{Any, CorsLayer};

use crate::{handlers, openapi, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Point API
        .route(
            "/api/points",
            get(handlers::points::list_points).post(handlers::points::create_point),
        )
        .route(
            "/api/points/{id}",
            get(handlers::points::get_point)
                .patch(handlers::points::update_point)
                .delete(handlers::points::delete_point),
        )
        // Banner API
        .route(
            "/api/banner",
            get(handlers::banner::get_banner).post(handlers::banner::update_banner),
        )
        .route("/api/banner/image", get(handlers::banner::get_banner_image))
        // Logo API
        .route(
            "/api/logo",
            get(handlers::logo::get_logo).post(handlers::logo::update_logo),
        )
        .route("/api/logo/image", get(handlers::logo::get_logo_image))
        // News API (the static /search segment takes priority over {id})
        .route(
            "/api/news",
            get(handlers::news::list_news).post(handlers::news::create_news),
        )
        .route("/api/news/search", get(handlers::news::search_news))
        .route(
            "/api/news/{id}",
            get(handlers::news::get_news)
                .put(handlers::news::update_news)
                .delete(handlers::news::delete_news),
        )
        .route("/api/news/{id}/image", get(handlers::news::get_news_image))
        // Interactive API documentation
        .merge(openapi::create_openapi_routes())
        // Attach state
        .with_state(state)
}

/// Build the CORS layer for the configured origins
///
/// Returns `None` when CORS is disabled. With no configured origins the
/// policy is permissive (development); otherwise it is restricted to the
/// listed origins.
#[must_use]
pub fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    let layer = if server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers(Any)
    };

    Some(layer)
}
