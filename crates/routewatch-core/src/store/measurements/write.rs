//! Append a measurement. The only write path; rows are never updated.

use super::super::db::{unix_timestamp, MeasurementDb, PersistenceError};
use super::super::types::{MeasurementId, NewMeasurement};

impl MeasurementDb {
    /// Insert one measurement in its own transaction.
    ///
    /// On any error the transaction is dropped uncommitted, so nothing is
    /// written. The row is visible to other readers once this returns Ok.
    pub async fn insert_measurement(
        &self,
        new: &NewMeasurement,
    ) -> Result<MeasurementId, PersistenceError> {
        let m = &new.measurement;
        let now = unix_timestamp();

        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            r#"
            INSERT INTO route_info (
                timestamp, date, day_of_week, from_coords, to_coords,
                distance_km, travel_time_seconds, travel_time_minutes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(m.timestamp)
        .bind(&m.date)
        .bind(&m.day_of_week)
        .bind(&new.from_coords)
        .bind(&new.to_coords)
        .bind(m.distance_km)
        .bind(m.travel_time_seconds)
        .bind(m.travel_time_minutes)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        tx.commit().await?;

        Ok(id)
    }
}
