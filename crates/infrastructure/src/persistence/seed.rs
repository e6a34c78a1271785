//! Sample data seeding
//!
//! Fills empty tables with the Tanjungpinang starter data so a fresh
//! deployment renders a usable map and banner immediately. Tables that
//! already hold rows are left untouched.

use chrono::Utc;
use domain::entities::DEFAULT_BANNER_CAPTION;
use rusqlite::{Connection, params};
use tracing::{debug, info};

use super::connection::DatabaseError;

/// Starter risk points for Tanjungpinang (name, lat, lng)
const SAMPLE_POINTS: &[(&str, f64, f64)] = &[
    ("Batu IX", 0.9167, 104.4510),
    ("Dompak", 0.9300, 104.4200),
    ("Kampung Bugis", 0.9100, 104.4600),
    ("Sei Jang", 0.9400, 104.4400),
    ("Bukit Cermin", 0.9200, 104.4300),
];

/// Insert sample points and the default banner into empty tables
pub fn seed_sample_data(conn: &mut Connection) -> Result<(), DatabaseError> {
    let tx = conn
        .transaction()
        .map_err(|e| DatabaseError::Seed(e.to_string()))?;

    let now = Utc::now().to_rfc3339();

    let point_count: i64 = tx
        .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))
        .map_err(|e| DatabaseError::Seed(e.to_string()))?;

    if point_count == 0 {
        for (name, lat, lng) in SAMPLE_POINTS {
            tx.execute(
                "INSERT INTO points (name, lat, lng, category, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 'medium', NULL, ?4, ?4)",
                params![name, lat, lng, now],
            )
            .map_err(|e| DatabaseError::Seed(e.to_string()))?;
        }
        info!(count = SAMPLE_POINTS.len(), "Seeded sample risk points");
    } else {
        debug!(count = point_count, "Points table already populated, skipping seed");
    }

    let banner_count: i64 = tx
        .query_row("SELECT COUNT(*) FROM banner", [], |row| row.get(0))
        .map_err(|e| DatabaseError::Seed(e.to_string()))?;

    if banner_count == 0 {
        tx.execute(
            "INSERT INTO banner (id, image_data, mime_type, caption, updated_at)
             VALUES (1, NULL, NULL, ?1, ?2)",
            params![DEFAULT_BANNER_CAPTION, now],
        )
        .map_err(|e| DatabaseError::Seed(e.to_string()))?;
        info!("Seeded default banner caption");
    }

    tx.commit().map_err(|e| DatabaseError::Seed(e.to_string()))
}
