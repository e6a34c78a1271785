//! HTTP middleware components
//!
//! This module contains middleware for authentication, rate limiting,
//! and request validation.

pub mod auth;
pub mod rate_limit;
pub mod validation;

pub use auth::{BasicAuth, BasicAuthLayer};
pub use rate_limit::{RateLimiter, RateLimiterConfig, RateLimiterLayer, RateLimiterState};
pub use validation::{ValidatedJson, ValidationError};
