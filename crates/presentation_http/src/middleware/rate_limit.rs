//! Rate limiting middleware
//!
//! Token bucket rate limiter that limits requests per IP address. Two
//! buckets apply: a general one for public reads and a stricter one for
//! admin and mutating requests.

use std::{
    collections::HashMap,
    future::Future,
    net::IpAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use axum::{
    extract::Request,
    http::Method,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use tower::{Layer, Service};

use crate::error::ApiError;

/// Rate limiter configuration
#[derive(Clone, Debug)]
pub struct RateLimiterConfig {
    /// Maximum requests per minute for public routes
    pub requests_per_minute: u32,
    /// Maximum requests per minute for admin and mutating routes
    pub admin_requests_per_minute: u32,
    /// Path prefix treated as admin regardless of method
    pub admin_path_prefix: String,
    /// Enable rate limiting
    pub enabled: bool,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 120,
            admin_requests_per_minute: 30,
            admin_path_prefix: "/admin".to_string(),
            enabled: true,
        }
    }
}

/// Token bucket entry for a single IP
#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(max_tokens: f64) -> Self {
        Self {
            tokens: max_tokens,
            last_update: Instant::now(),
        }
    }

    /// Try to consume a token, returning true if allowed
    fn try_consume(&mut self, tokens_per_second: f64, max_tokens: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens based on elapsed time
        self.tokens = elapsed
            .mul_add(tokens_per_second, self.tokens)
            .min(max_tokens);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Shared rate limiter state for one bucket tier
#[derive(Debug)]
pub struct RateLimiterState {
    buckets: RwLock<HashMap<IpAddr, TokenBucket>>,
    tokens_per_second: f64,
    max_tokens: f64,
}

impl RateLimiterState {
    /// Create a new rate limiter state
    #[must_use]
    pub fn new(requests_per_minute: u32) -> Self {
        let max_tokens = f64::from(requests_per_minute);
        Self {
            buckets: RwLock::new(HashMap::new()),
            tokens_per_second: max_tokens / 60.0,
            max_tokens,
        }
    }

    /// Check if a request from the given IP is allowed
    #[allow(clippy::significant_drop_tightening)]
    pub async fn check(&self, ip: IpAddr) -> bool {
        let mut buckets = self.buckets.write().await;

        let bucket = buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.max_tokens));

        let tokens_per_second = self.tokens_per_second;
        let max_tokens = self.max_tokens;
        bucket.try_consume(tokens_per_second, max_tokens)
    }

    /// Clean up stale entries older than the specified duration
    pub async fn cleanup(&self, older_than: Duration) {
        let mut buckets = self.buckets.write().await;
        let cutoff = Instant::now()
            .checked_sub(older_than)
            .unwrap_or_else(Instant::now);

        buckets.retain(|_, bucket| bucket.last_update > cutoff);
    }
}

/// Layer that applies rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    general: Arc<RateLimiterState>,
    admin: Arc<RateLimiterState>,
    admin_path_prefix: String,
    enabled: bool,
    excluded_paths: Vec<String>,
}

impl RateLimiterLayer {
    /// Create a new rate limiter layer
    #[must_use]
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            general: Arc::new(RateLimiterState::new(config.requests_per_minute)),
            admin: Arc::new(RateLimiterState::new(config.admin_requests_per_minute)),
            admin_path_prefix: config.admin_path_prefix.clone(),
            enabled: config.enabled,
            excluded_paths: vec!["/health".to_string()],
        }
    }

    /// Add paths that should be excluded from rate limiting
    #[must_use]
    pub fn exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths.extend(paths);
        self
    }

    /// General bucket state, for cleanup tasks
    #[must_use]
    pub fn state(&self) -> Arc<RateLimiterState> {
        Arc::clone(&self.general)
    }

    /// Admin bucket state, for cleanup tasks
    #[must_use]
    pub fn admin_state(&self) -> Arc<RateLimiterState> {
        Arc::clone(&self.admin)
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            general: Arc::clone(&self.general),
            admin: Arc::clone(&self.admin),
            admin_path_prefix: self.admin_path_prefix.clone(),
            enabled: self.enabled,
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiter<S> {
    inner: S,
    general: Arc<RateLimiterState>,
    admin: Arc<RateLimiterState>,
    admin_path_prefix: String,
    enabled: bool,
    excluded_paths: Vec<String>,
}

/// Whether the stricter admin bucket applies to this request
fn is_admin_request(path: &str, method: &Method, admin_prefix: &str) -> bool {
    path.starts_with(admin_prefix)
        || (path.starts_with("/api")
            && matches!(
                *method,
                Method::POST | Method::PUT | Method::PATCH | Method::DELETE
            ))
}

impl<S> Service<Request> for RateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let enabled = self.enabled;
        let general = Arc::clone(&self.general);
        let admin = Arc::clone(&self.admin);
        let admin_path_prefix = self.admin_path_prefix.clone();
        let excluded_paths = self.excluded_paths.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // If rate limiting is disabled, pass through
            if !enabled {
                return inner.call(req).await;
            }

            // Check if path is excluded
            let path = req.uri().path();
            if excluded_paths.iter().any(|p| path.starts_with(p)) {
                return inner.call(req).await;
            }

            let state = if is_admin_request(path, req.method(), &admin_path_prefix) {
                admin
            } else {
                general
            };

            let client_ip = extract_client_ip(&req);

            if state.check(client_ip).await {
                inner.call(req).await
            } else {
                Ok(ApiError::RateLimited.into_response())
            }
        })
    }
}

fn extract_client_ip(req: &Request) -> IpAddr {
    // Try X-Forwarded-For header first (for reverse proxy setups)
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        // Take the first IP in the chain (original client)
        if let Some(ip_str) = forwarded.split(',').next() {
            if let Ok(ip) = ip_str.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }

    // Fallback when the connection IP is unavailable
    "127.0.0.1"
        .parse()
        .unwrap_or(IpAddr::V4(std::net::Ipv4Addr::LOCALHOST))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        routing::{get, post},
    };
    use tower::ServiceExt;

    use super::*;

    async fn test_handler() -> &'static str {
        "ok"
    }

    fn test_config(rpm: u32, admin_rpm: u32) -> RateLimiterConfig {
        RateLimiterConfig {
            requests_per_minute: rpm,
            admin_requests_per_minute: admin_rpm,
            admin_path_prefix: "/admin".to_string(),
            enabled: true,
        }
    }

    fn create_test_router(config: &RateLimiterConfig) -> Router {
        Router::new()
            .route("/api/points", get(test_handler).post(test_handler))
            .route("/admin/banner", post(test_handler))
            .route("/health", get(test_handler))
            .layer(RateLimiterLayer::new(config))
    }

    #[tokio::test]
    async fn disabled_limiter_passes_all_requests() {
        let config = RateLimiterConfig {
            enabled: false,
            ..test_config(1, 1)
        };
        let app = create_test_router(&config);

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/points")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), axum::http::StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn general_bucket_blocks_excess_requests() {
        let app = create_test_router(&test_config(2, 30));

        let mut limited = false;
        for _ in 0..4 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/points")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            if response.status() == axum::http::StatusCode::TOO_MANY_REQUESTS {
                limited = true;
                break;
            }
        }
        assert!(limited, "expected 429 with a 2 rpm budget");
    }

    #[tokio::test]
    async fn admin_bucket_is_stricter_than_general() {
        // Generous general budget, single-token admin budget
        let app = create_test_router(&test_config(100, 1));

        // First mutating request consumes the admin token
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/points")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        // Second mutating request gets limited
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/points")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            axum::http::StatusCode::TOO_MANY_REQUESTS
        );

        // Public reads still pass on the general bucket
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/points")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn health_endpoint_excluded_from_rate_limit() {
        let app = create_test_router(&test_config(1, 1));

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/health")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), axum::http::StatusCode::OK);
        }
    }

    #[test]
    fn admin_request_classification() {
        assert!(is_admin_request("/admin/banner", &Method::GET, "/admin"));
        assert!(is_admin_request("/api/news", &Method::POST, "/admin"));
        assert!(!is_admin_request("/api/news", &Method::GET, "/admin"));
        assert!(!is_admin_request("/health", &Method::GET, "/admin"));
    }

    #[tokio::test]
    async fn token_bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(1.0);
        let tokens_per_second = 1.0;
        let max_tokens = 1.0;

        // Consume the token
        assert!(bucket.try_consume(tokens_per_second, max_tokens));
        // Should be empty now
        assert!(!bucket.try_consume(tokens_per_second, max_tokens));

        // Simulate time passing by manipulating last_update
        bucket.last_update = Instant::now()
            .checked_sub(Duration::from_secs(2))
            .expect("Time subtraction should succeed");

        // Should have refilled
        assert!(bucket.try_consume(tokens_per_second, max_tokens));
    }

    #[tokio::test]
    async fn cleanup_keeps_recent_entries() {
        let state = RateLimiterState::new(60);
        let ip: IpAddr = "192.168.1.1".parse().unwrap();

        state.check(ip).await;
        state.cleanup(Duration::from_secs(3600)).await;
        assert_eq!(state.buckets.read().await.len(), 1);
    }
}
