//! `routewatch analyze` – coverage, gaps, and daily statistics.

use anyhow::Result;
use routewatch_core::analysis;
use routewatch_core::config::RouteWatchConfig;
use routewatch_core::store::MeasurementDb;

use super::verify::civil;

const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S %Z";

fn human_duration(secs: i64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h{:02}m{:02}s", h, m, s)
    } else {
        format!("{}m{:02}s", m, s)
    }
}

pub async fn run_analyze(cfg: &RouteWatchConfig) -> Result<()> {
    let db = MeasurementDb::open(cfg.database_path.as_deref()).await?;
    let Some(report) = analysis::analyze_db(&db, cfg.interval_minutes()).await? else {
        println!("No data found in the database!");
        return Ok(());
    };

    println!("\nData Collection Summary:");
    println!("{}", "-".repeat(80));
    println!("Total records: {}", report.total);
    println!(
        "Date range: {} to {}",
        civil(report.first, TIME_FMT),
        civil(report.last, TIME_FMT)
    );
    println!(
        "Expected records (every {} mins): {}",
        report.interval_minutes, report.expected_records
    );
    println!("Average travel time: {:.1} minutes", report.average_minutes);
    println!("Min travel time: {} minutes", report.min_minutes);
    println!("Max travel time: {} minutes", report.max_minutes);

    if !report.gaps.is_empty() {
        println!("\nFound gaps in data collection:");
        for gap in &report.gaps {
            println!(
                "Gap of {} on {} → {}: {} to {}",
                human_duration(gap.duration_secs()),
                gap.from_coords,
                gap.to_coords,
                civil(gap.start, TIME_FMT),
                civil(gap.end, TIME_FMT)
            );
        }
    }

    println!("\nDaily Statistics:");
    println!("{}", "-".repeat(80));
    println!("{:<12} {:>6} {:>8} {:>6} {:>6}", "DATE", "COUNT", "MEAN", "MIN", "MAX");
    for day in &report.daily {
        println!(
            "{:<12} {:>6} {:>8.1} {:>6} {:>6}",
            day.date, day.count, day.mean_minutes, day.min_minutes, day.max_minutes
        );
    }
    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::human_duration;

    #[test]
    fn formats_gap_durations() {
        assert_eq!(human_duration(420), "7m00s");
        assert_eq!(human_duration(3725), "1h02m05s");
    }
}
