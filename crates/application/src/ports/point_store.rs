//! Point storage port
//!
//! Defines the interface for monitored area point persistence.

use async_trait::async_trait;
use domain::{
    entities::{Point, RiskCategory},
    value_objects::GeoLocation,
};

use crate::error::ApplicationError;

/// Data for a point to be created
#[derive(Debug, Clone)]
pub struct NewPoint {
    /// Area name (already sanitized)
    pub name: String,
    /// Geographic position
    pub location: GeoLocation,
    /// Risk classification
    pub category: RiskCategory,
    /// Optional description (already sanitized)
    pub description: Option<String>,
}

/// Partial update for an existing point
///
/// `None` fields are left untouched. A present but empty string sets the
/// field to empty.
#[derive(Debug, Clone, Default)]
pub struct PointUpdate {
    /// New area name
    pub name: Option<String>,
    /// New latitude
    pub lat: Option<f64>,
    /// New longitude
    pub lng: Option<f64>,
    /// New risk classification
    pub category: Option<RiskCategory>,
    /// New description
    pub description: Option<String>,
}

impl PointUpdate {
    /// Whether the update would change anything
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.lat.is_some()
            || self.lng.is_some()
            || self.category.is_some()
            || self.description.is_some()
    }
}

/// Port for point storage operations
#[async_trait]
pub trait PointStore: Send + Sync {
    /// List all points, newest first
    async fn list(&self) -> Result<Vec<Point>, ApplicationError>;

    /// Get a point by ID
    async fn get(&self, id: i64) -> Result<Option<Point>, ApplicationError>;

    /// Create a point, returning the stored row with its assigned ID
    async fn create(&self, point: NewPoint) -> Result<Point, ApplicationError>;

    /// Apply a partial update
    ///
    /// Returns `None` when no point with the given ID exists.
    async fn update(&self, id: i64, update: &PointUpdate)
    -> Result<Option<Point>, ApplicationError>;

    /// Delete a point, returning the number of rows removed (0 or 1)
    async fn delete(&self, id: i64) -> Result<u64, ApplicationError>;

    /// Count stored points (health probe)
    async fn count(&self) -> Result<u64, ApplicationError>;
}
