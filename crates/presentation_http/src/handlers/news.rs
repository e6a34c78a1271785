//! News article handlers
//!
//! Public reads and search plus authenticated create, replace, and delete.

use application::{
    escape_html,
    ports::{NewArticle, NewsUpdate},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use chrono::{DateTime, Utc};
use domain::{entities::NewsArticle, value_objects::ImagePayload};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::ApiError, handlers::image_response, handlers::points::DeleteResponse,
    middleware::ValidatedJson, state::AppState,
};

const MAX_SEARCH_QUERY_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Response / request DTOs
// ---------------------------------------------------------------------------

/// News article as returned by the API (image bytes are served separately)
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "title": "Community watch launched",
    "content": "Residents of Kampung Bugis started a neighborhood watch.",
    "author": "Admin",
    "has_image": false,
    "created_at": "2024-06-01T08:00:00Z",
    "updated_at": "2024-06-01T08:00:00Z"
}))]
pub struct NewsResponse {
    /// Article ID
    pub id: i64,
    /// Headline
    pub title: String,
    /// Article body
    pub content: String,
    /// Author display name
    pub author: String,
    /// Whether a cover image is stored
    pub has_image: bool,
    /// MIME type of the stored cover image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<NewsArticle> for NewsResponse {
    fn from(article: NewsArticle) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            author: article.author,
            has_image: article.image.is_some(),
            mime_type: article
                .image
                .as_ref()
                .map(|image| image.mime_type().to_string()),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Create article request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "title": "Community watch launched",
    "content": "Residents of Kampung Bugis started a neighborhood watch.",
    "author": "Admin"
}))]
pub struct CreateNewsRequest {
    /// Headline
    #[validate(length(min = 1, max = 300, message = "must be between 1 and 300 characters"))]
    pub title: String,
    /// Article body
    #[validate(length(min = 1, max = 10000, message = "must be between 1 and 10000 characters"))]
    pub content: String,
    /// Author display name
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub author: String,
    /// Cover image as a data URL or bare base64
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Replace article request body
///
/// Text fields always replace the stored values; an absent image keeps
/// the stored one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateNewsRequest {
    /// New headline
    #[validate(length(min = 1, max = 300, message = "must be between 1 and 300 characters"))]
    pub title: String,
    /// New body
    #[validate(length(min = 1, max = 10000, message = "must be between 1 and 10000 characters"))]
    pub content: String,
    /// New author display name
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub author: String,
    /// New cover image, absent keeps the stored one
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring to match against title, content, and author
    #[serde(default)]
    pub q: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List all articles, newest first
///
/// GET /api/news
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    responses(
        (status = 200, description = "All articles", body = Vec<NewsResponse>)
    )
)]
#[instrument(skip(state))]
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsResponse>>, ApiError> {
    let articles = state.news.list().await?;
    let response: Vec<NewsResponse> = articles.into_iter().map(Into::into).collect();
    debug!(count = response.len(), "Listed news articles");
    Ok(Json(response))
}

/// Get a single article
///
/// GET /api/news/:id
#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "news",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "The article", body = NewsResponse),
        (status = 404, description = "No such article", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NewsResponse>, ApiError> {
    let article = state
        .news
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {id} not found")))?;
    Ok(Json(article.into()))
}

/// Get the cover image bytes of an article
///
/// GET /api/news/:id/image
#[utoipa::path(
    get,
    path = "/api/news/{id}/image",
    tag = "news",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Raw image bytes", content_type = "image/*"),
        (status = 404, description = "No such article or no image stored", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_news_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let article = state
        .news
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {id} not found")))?;
    image_response(article.image)
}

/// Search articles by substring
///
/// GET /api/news/search?q=
#[utoipa::path(
    get,
    path = "/api/news/search",
    tag = "news",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching articles, newest first", body = Vec<NewsResponse>),
        (status = 400, description = "Query too long", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state, params))]
pub async fn search_news(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<NewsResponse>>, ApiError> {
    // Absent or empty q matches everything
    let query = params.q.unwrap_or_default();
    if query.chars().count() > MAX_SEARCH_QUERY_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Search query must be at most {MAX_SEARCH_QUERY_CHARS} characters"
        )));
    }

    let articles = state.news.search(&query).await?;
    let response: Vec<NewsResponse> = articles.into_iter().map(Into::into).collect();
    debug!(query = %query, count = response.len(), "Searched news articles");
    Ok(Json(response))
}

/// Create an article
///
/// POST /api/news
#[utoipa::path(
    post,
    path = "/api/news",
    tag = "news",
    request_body = CreateNewsRequest,
    responses(
        (status = 200, description = "Created article", body = NewsResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, req), fields(title = %req.title))]
pub async fn create_news(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateNewsRequest>,
) -> Result<Json<NewsResponse>, ApiError> {
    let image = parse_optional_image(req.image_data.as_deref())?;

    let article = state
        .news
        .create(NewArticle {
            title: escape_html(&req.title),
            content: req.content,
            image,
            author: escape_html(&req.author),
        })
        .await?;

    debug!(id = article.id, "Created news article");
    Ok(Json(article.into()))
}

/// Replace an article
///
/// PUT /api/news/:id
#[utoipa::path(
    put,
    path = "/api/news/{id}",
    tag = "news",
    params(("id" = i64, Path, description = "Article ID")),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "Updated article", body = NewsResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "No such article", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state, req))]
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateNewsRequest>,
) -> Result<Json<NewsResponse>, ApiError> {
    let image = parse_optional_image(req.image_data.as_deref())?;

    let update = NewsUpdate {
        title: escape_html(&req.title),
        content: req.content,
        image,
        author: escape_html(&req.author),
    };

    let article = state
        .news
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {id} not found")))?;

    debug!(id, "Updated news article");
    Ok(Json(article.into()))
}

/// Delete an article
///
/// DELETE /api/news/:id
#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    tag = "news",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    security(("basic_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = state.news.delete(id).await?;
    debug!(id, removed, "Deleted news article");
    Ok(Json(DeleteResponse { ok: true, removed }))
}

fn parse_optional_image(image_data: Option<&str>) -> Result<Option<ImagePayload>, ApiError> {
    image_data
        .map(ImagePayload::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
