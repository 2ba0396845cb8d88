//! `routewatch verify` – show the latest measurements.

use anyhow::Result;
use routewatch_core::analysis;
use routewatch_core::config::RouteWatchConfig;
use routewatch_core::normalize::to_civil;
use routewatch_core::store::MeasurementDb;

const RULE: &str = "--------------------------------------------------------------------------------";

pub(crate) fn civil(ts: i64, fmt: &str) -> String {
    to_civil(ts)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub async fn run_verify(cfg: &RouteWatchConfig, limit: u32) -> Result<()> {
    let db = MeasurementDb::open(cfg.database_path.as_deref()).await?;
    let summary = analysis::verify(&db, limit).await?;
    if summary.rows.is_empty() {
        println!("No data found in the database!");
        return Ok(());
    }

    println!("\nLast {} route measurements:", summary.rows.len());
    println!("{RULE}");
    for row in &summary.rows {
        println!("Time (Dubai): {}", civil(row.timestamp, "%Y-%m-%d %H:%M:%S %Z"));
        println!("Route: {} → {}", row.from_coords, row.to_coords);
        println!("Travel Time: {} minutes", row.travel_time_minutes);
        println!("Distance: {:.2} km", row.distance_km);
        println!("{RULE}");
    }

    println!("\nSummary Statistics:");
    println!("Total records: {}", summary.total);
    if let Some((first, last)) = summary.range {
        println!(
            "Date range: {} to {}",
            civil(first, "%Y-%m-%d %H:%M %Z"),
            civil(last, "%Y-%m-%d %H:%M %Z")
        );
    }
    if let Some(avg) = summary.average_minutes {
        println!("Average travel time: {:.1} minutes", avg);
    }
    db.close().await;
    Ok(())
}
