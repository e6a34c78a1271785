//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod image_payload;

pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use image_payload::{DEFAULT_MIME_TYPE, ImagePayload, MAX_IMAGE_BYTES};
