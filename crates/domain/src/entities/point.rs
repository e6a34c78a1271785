//! Monitored area points and their risk classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// Risk classification of a monitored area
///
/// Stored and serialized as `low` / `medium` / `high`. The legacy Indonesian
/// values `rendah` / `sedang` / `tinggi` from the original data set are
/// accepted as input aliases and normalized on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    /// Low risk area
    #[serde(alias = "rendah")]
    Low,
    /// Medium risk area
    #[serde(alias = "sedang")]
    Medium,
    /// High risk area
    #[serde(alias = "tinggi")]
    High,
}

impl RiskCategory {
    /// Canonical string representation used on the wire and in storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a category string, accepting legacy aliases
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCategory` for unknown values.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "low" | "rendah" => Ok(Self::Low),
            "medium" | "sedang" => Ok(Self::Medium),
            "high" | "tinggi" => Ok(Self::High),
            other => Err(DomainError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored area point on the public map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Database-assigned identifier
    pub id: i64,
    /// Area name
    pub name: String,
    /// Geographic position
    pub location: GeoLocation,
    /// Risk classification
    pub category: RiskCategory,
    /// Optional free-text description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_as_str() {
        assert_eq!(RiskCategory::Low.as_str(), "low");
        assert_eq!(RiskCategory::Medium.as_str(), "medium");
        assert_eq!(RiskCategory::High.as_str(), "high");
    }

    #[test]
    fn category_parse_canonical() {
        assert_eq!(RiskCategory::parse("low").unwrap(), RiskCategory::Low);
        assert_eq!(RiskCategory::parse("medium").unwrap(), RiskCategory::Medium);
        assert_eq!(RiskCategory::parse("high").unwrap(), RiskCategory::High);
    }

    #[test]
    fn category_parse_legacy_aliases() {
        assert_eq!(RiskCategory::parse("rendah").unwrap(), RiskCategory::Low);
        assert_eq!(RiskCategory::parse("sedang").unwrap(), RiskCategory::Medium);
        assert_eq!(RiskCategory::parse("tinggi").unwrap(), RiskCategory::High);
    }

    #[test]
    fn category_parse_rejects_unknown() {
        assert!(matches!(
            RiskCategory::parse("extreme"),
            Err(DomainError::InvalidCategory(_))
        ));
    }

    #[test]
    fn category_deserialize_alias() {
        let cat: RiskCategory = serde_json::from_str("\"sedang\"").unwrap();
        assert_eq!(cat, RiskCategory::Medium);
    }

    #[test]
    fn category_serializes_canonical() {
        let json = serde_json::to_string(&RiskCategory::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn category_roundtrip() {
        for cat in [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High] {
            assert_eq!(RiskCategory::parse(cat.as_str()).unwrap(), cat);
        }
    }

    #[test]
    fn point_serialization() {
        let point = Point {
            id: 1,
            name: "Batu IX".to_string(),
            location: GeoLocation::new_unchecked(0.9167, 104.4510),
            category: RiskCategory::Medium,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("Batu IX"));
        assert!(json.contains("\"medium\""));
    }
}
