//! HTTP Basic authentication middleware
//!
//! Gates the admin prefix and every mutating API request behind a single
//! username/password pair from configuration. Credentials are hashed with
//! BLAKE3 at construction and compared with `subtle` so verification takes
//! the same time regardless of where the mismatch is. Every failure mode
//! produces the same 401 with a `WWW-Authenticate` challenge.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::{Method, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use infrastructure::SecurityConfig;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ApiError;

/// Expected credentials, stored as BLAKE3 digests
#[derive(Clone)]
struct AdminCredentials {
    username_hash: [u8; 32],
    password_hash: [u8; 32],
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials").finish_non_exhaustive()
    }
}

impl AdminCredentials {
    fn new(username: &str, password: &str) -> Self {
        Self {
            username_hash: *blake3::hash(username.as_bytes()).as_bytes(),
            password_hash: *blake3::hash(password.as_bytes()).as_bytes(),
        }
    }

    /// Constant-time check of both credential halves
    ///
    /// Hashing first makes the comparison independent of input length, and
    /// the bitwise AND ensures both halves are always compared.
    fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = blake3::hash(username.as_bytes())
            .as_bytes()
            .ct_eq(&self.username_hash);
        let password_ok = blake3::hash(password.as_bytes())
            .as_bytes()
            .ct_eq(&self.password_hash);
        bool::from(username_ok & password_ok)
    }
}

/// Layer that applies HTTP Basic authentication to protected routes
#[derive(Clone, Debug)]
pub struct BasicAuthLayer {
    credentials: Arc<AdminCredentials>,
    /// Path prefix where every method requires authentication
    admin_path_prefix: String,
}

impl BasicAuthLayer {
    /// Create a layer from explicit credentials
    #[must_use]
    pub fn new(username: &str, password: &str, admin_path_prefix: impl Into<String>) -> Self {
        Self {
            credentials: Arc::new(AdminCredentials::new(username, password)),
            admin_path_prefix: admin_path_prefix.into(),
        }
    }

    /// Create a layer from the security configuration
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.admin_username.expose_secret(),
            config.admin_password.expose_secret(),
            config.admin_path_prefix.clone(),
        )
    }
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuth {
            inner,
            credentials: Arc::clone(&self.credentials),
            admin_path_prefix: self.admin_path_prefix.clone(),
        }
    }
}

/// Middleware service for HTTP Basic authentication
#[derive(Clone, Debug)]
pub struct BasicAuth<S> {
    inner: S,
    credentials: Arc<AdminCredentials>,
    admin_path_prefix: String,
}

/// Whether a request needs admin credentials
///
/// Everything under the admin prefix is protected, as is any mutating
/// method on the public API. Reads stay open.
fn requires_auth(path: &str, method: &Method, admin_prefix: &str) -> bool {
    if path.starts_with(admin_prefix) {
        return true;
    }
    path.starts_with("/api")
        && matches!(
            *method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
}

/// Extract the username and password from an Authorization header value
///
/// The header must be exactly `Basic <base64>` where the decoded payload is
/// UTF-8 `username:password` split on the first colon.
fn decode_basic_credentials(header: &str) -> Option<(String, String)> {
    let mut parts = header.split(' ');
    let scheme = parts.next()?;
    let encoded = parts.next()?;
    if parts.next().is_some() || scheme != "Basic" {
        return None;
    }

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

impl<S> Service<Request> for BasicAuth<S>
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
        let credentials = Arc::clone(&self.credentials);
        let admin_path_prefix = self.admin_path_prefix.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !requires_auth(req.uri().path(), req.method(), &admin_path_prefix) {
                return inner.call(req).await;
            }

            let auth_header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            let verified = auth_header
                .and_then(decode_basic_credentials)
                .is_some_and(|(username, password)| credentials.verify(&username, &password));

            if verified {
                debug!(path = %req.uri().path(), "Admin request authenticated");
                inner.call(req).await
            } else {
                // One response for missing, malformed, and wrong credentials
                Ok(ApiError::Unauthorized("Authentication required".to_string()).into_response())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{StatusCode, header},
        routing::{delete, get, post},
    };
    use tower::ServiceExt;

    use super::*;

    async fn test_handler() -> &'static str {
        "ok"
    }

    fn encode(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/api/points", get(test_handler).post(test_handler))
            .route("/api/points/{id}", delete(test_handler))
            .route("/admin/banner", post(test_handler))
            .route("/health", get(test_handler))
            .layer(BasicAuthLayer::new("admin", "password", "/admin"))
    }

    #[tokio::test]
    async fn public_read_passes_without_credentials() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/points")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_passes_without_credentials() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mutating_api_request_requires_credentials() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/points")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn admin_path_requires_credentials_for_all_methods() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/banner")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_credentials_pass() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/points")
                    .header(AUTHORIZATION, encode("admin", "password"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_rejected() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/points/1")
                    .header(AUTHORIZATION, encode("admin", "wrong"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_scheme_rejected() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/points")
                    .header(AUTHORIZATION, "Bearer some-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_base64_rejected() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/points")
                    .header(AUTHORIZATION, "Basic not!!base64")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn decode_splits_on_first_colon() {
        let header = format!("Basic {}", STANDARD.encode("admin:pa:ss:word"));
        let (user, pass) = decode_basic_credentials(&header).unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "pa:ss:word");
    }

    #[test]
    fn decode_rejects_extra_tokens() {
        let header = format!("Basic {} extra", STANDARD.encode("admin:password"));
        assert!(decode_basic_credentials(&header).is_none());
    }

    #[test]
    fn decode_rejects_missing_colon() {
        let header = format!("Basic {}", STANDARD.encode("adminpassword"));
        assert!(decode_basic_credentials(&header).is_none());
    }

    #[test]
    fn credentials_verify_both_halves() {
        let creds = AdminCredentials::new("admin", "password");
        assert!(creds.verify("admin", "password"));
        assert!(!creds.verify("admin", "wrong"));
        assert!(!creds.verify("wrong", "password"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn requires_auth_matrix() {
        let prefix = "/admin";
        assert!(requires_auth("/admin/banner", &Method::GET, prefix));
        assert!(requires_auth("/api/points", &Method::POST, prefix));
        assert!(requires_auth("/api/news/3", &Method::DELETE, prefix));
        assert!(!requires_auth("/api/points", &Method::GET, prefix));
        assert!(!requires_auth("/health", &Method::GET, prefix));
        assert!(!requires_auth("/health", &Method::POST, prefix));
    }

    #[test]
    fn credentials_debug_hides_hashes() {
        let creds = AdminCredentials::new("admin", "password");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("password"));
    }
}
