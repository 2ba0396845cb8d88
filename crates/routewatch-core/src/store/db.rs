//! SQLite-backed measurement database.
//!
//! Handles connection, migrations, and timestamp helpers. Row I/O lives in `measurements`.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::config;

/// A write or commit failed; the transaction was rolled back.
#[derive(Debug, Error)]
#[error("persisting measurement failed: {0}")]
pub struct PersistenceError(#[from] pub sqlx::Error);

/// Handle to the SQLite-backed measurement database.
///
/// The default file is `~/.local/state/routewatch/routes.db`.
#[derive(Clone)]
pub struct MeasurementDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl MeasurementDb {
    /// Open (or create) the default database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let db_path = config::state_file("routes.db")?;
        Self::open_at(&db_path).await
    }

    /// Open the configured database, or the default one when none is set.
    pub async fn open(database_path: Option<&Path>) -> Result<Self> {
        match database_path {
            Some(path) => Self::open_at(path).await,
            None => Self::open_default().await,
        }
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        let db = MeasurementDb { pool };
        db.migrate().await?;
        tracing::debug!(path = %path.display(), "measurement database ready");
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // `timestamp` and `created_at` are Unix seconds.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS route_info (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                date TEXT NOT NULL,
                day_of_week TEXT NOT NULL,
                from_coords TEXT NOT NULL,
                to_coords TEXT NOT NULL,
                distance_km REAL NOT NULL,
                travel_time_seconds INTEGER NOT NULL,
                travel_time_minutes INTEGER NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_route_info_route_time
            ON route_info (from_coords, to_coords, timestamp);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Current time as Unix seconds (for `created_at`).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O). Single connection so
/// every query sees the same database.
pub(crate) async fn open_memory() -> Result<MeasurementDb> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = MeasurementDb { pool };
    db.migrate().await?;
    Ok(db)
}
