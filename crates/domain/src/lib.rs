//! Domain layer for RawanMap
//!
//! Contains core business logic, entities, value objects, and domain errors.
//! This layer has no framework dependencies and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
