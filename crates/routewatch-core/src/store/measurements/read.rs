//! Read paths for verification and analysis.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::super::db::MeasurementDb;
use super::super::types::{MeasurementId, StoredMeasurement};

const COLUMNS: &str = "id, timestamp, date, day_of_week, from_coords, to_coords, \
     distance_km, travel_time_seconds, travel_time_minutes, created_at";

fn from_row(row: &SqliteRow) -> StoredMeasurement {
    StoredMeasurement {
        id: row.get("id"),
        timestamp: row.get("timestamp"),
        date: row.get("date"),
        day_of_week: row.get("day_of_week"),
        from_coords: row.get("from_coords"),
        to_coords: row.get("to_coords"),
        distance_km: row.get("distance_km"),
        travel_time_seconds: row.get("travel_time_seconds"),
        travel_time_minutes: row.get("travel_time_minutes"),
        created_at: row.get("created_at"),
    }
}

impl MeasurementDb {
    /// Total number of stored measurements.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM route_info")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Fetch one row by id.
    pub async fn get(&self, id: MeasurementId) -> Result<Option<StoredMeasurement>> {
        let sql = format!("SELECT {COLUMNS} FROM route_info WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(from_row))
    }

    /// The `limit` most recent measurements, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<StoredMeasurement>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM route_info ORDER BY timestamp DESC, id DESC LIMIT ?1"
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(from_row).collect())
    }

    /// Every measurement, oldest first.
    pub async fn all_ordered(&self) -> Result<Vec<StoredMeasurement>> {
        let sql = format!("SELECT {COLUMNS} FROM route_info ORDER BY timestamp ASC, id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(from_row).collect())
    }

    /// Measurements for one origin/destination pair, oldest first.
    pub async fn for_route(
        &self,
        from_coords: &str,
        to_coords: &str,
    ) -> Result<Vec<StoredMeasurement>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM route_info \
             WHERE from_coords = ?1 AND to_coords = ?2 \
             ORDER BY timestamp ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(from_coords)
            .bind(to_coords)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(from_row).collect())
    }
}
