//! Request validation
//!
//! Provides a `ValidatedJson` extractor that validates request bodies using
//! the validator crate. All field failures are collected so a response names
//! every invalid field, not just the first.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed")]
    ValidationFailed(Vec<String>),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = match self {
            Self::JsonError(e) => serde_json::json!({
                // Serde's message names the missing or mistyped field
                "error": e.to_string(),
                "code": "validation_error",
            }),
            Self::ValidationFailed(details) => serde_json::json!({
                "error": "Validation failed",
                "code": "validation_error",
                "details": details,
            }),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// A JSON extractor that also validates the request body
///
/// Use this instead of `Json<T>` when you want automatic validation
/// of the request body using the `validator` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(|e| {
            let mut errors: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors
                        .iter()
                        .map(|error| {
                            format!(
                                "{}: {}",
                                field,
                                error
                                    .message
                                    .as_ref()
                                    .map_or_else(|| error.code.to_string(), ToString::to_string)
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
            errors.sort();

            ValidationError::ValidationFailed(errors)
        })?;

        Ok(Self(value))
    }
}
