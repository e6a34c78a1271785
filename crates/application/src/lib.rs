//! Application layer - Use cases and orchestration
//!
//! Contains application-level logic, port definitions, and input sanitization.
//! Orchestrates domain objects and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod sanitize;

pub use error::ApplicationError;
pub use ports::*;
pub use sanitize::escape_html;
