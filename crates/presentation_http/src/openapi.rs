//! OpenAPI documentation module
//!
//! Provides OpenAPI 3.0 documentation for the RawanMap HTTP API.
//! Includes Swagger UI and ReDoc for interactive API exploration.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::{Router, response::Html, routing::get};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{handlers, state::AppState};

/// OpenAPI documentation for RawanMap
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RawanMap API",
        version = "0.1.0",
        description = "Public drug-risk area map for Kota Tanjungpinang: risk points, news, and site assets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Storage reachability probe"),
        (name = "points", description = "Drug-risk map points"),
        (name = "banner", description = "Homepage banner singleton"),
        (name = "logo", description = "Site logo singleton"),
        (name = "news", description = "News articles and search")
    ),
    paths(
        // Health endpoints
        handlers::health::health_check,
        // Point endpoints
        handlers::points::list_points,
        handlers::points::get_point,
        handlers::points::create_point,
        handlers::points::update_point,
        handlers::points::delete_point,
        // Banner endpoints
        handlers::banner::get_banner,
        handlers::banner::get_banner_image,
        handlers::banner::update_banner,
        // Logo endpoints
        handlers::logo::get_logo,
        handlers::logo::get_logo_image,
        handlers::logo::update_logo,
        // News endpoints
        handlers::news::list_news,
        handlers::news::get_news,
        handlers::news::get_news_image,
        handlers::news::search_news,
        handlers::news::create_news,
        handlers::news::update_news,
        handlers::news::delete_news,
    ),
    components(
        schemas(
            // Health schemas
            handlers::health::HealthResponse,
            // Point schemas
            handlers::points::PointResponse,
            handlers::points::CreatePointRequest,
            handlers::points::UpdatePointRequest,
            handlers::points::DeleteResponse,
            // Banner schemas
            handlers::banner::BannerResponse,
            handlers::banner::UpdateBannerRequest,
            // Logo schemas
            handlers::logo::LogoResponse,
            handlers::logo::UpdateLogoRequest,
            // News schemas
            handlers::news::NewsResponse,
            handlers::news::CreateNewsRequest,
            handlers::news::UpdateNewsRequest,
            // Error schemas
            crate::error::ErrorResponse,
        )
    ),
    security(
        ("basic_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

/// Create OpenAPI documentation routes
///
/// Adds the following routes:
/// - `/api-docs/openapi.json` - OpenAPI specification (used by Swagger UI)
/// - `/docs/*` - Swagger UI interactive documentation
/// - `/redoc` - ReDoc documentation
pub fn create_openapi_routes() -> Router<AppState> {
    let redoc = Redoc::with_url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        // ReDoc documentation
        .route("/redoc", get(|| async move { Html(redoc.to_html()) }))
        // Swagger UI with assets - SwaggerUi will serve /api-docs/openapi.json internally
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
