//! Summaries over stored measurements: the `verify` snapshot and the full
//! `analyze` report (coverage, gaps, daily statistics).

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};

use crate::store::{MeasurementDb, StoredMeasurement};

/// Slack allowed on top of the collection interval before a gap is reported.
pub const GAP_SLACK_SECS: i64 = 60;

/// Consecutive measurements of one route further apart than this are a gap
/// (6 minutes at the default 5-minute cadence).
pub fn gap_threshold_secs(interval_minutes: u32) -> i64 {
    i64::from(interval_minutes.max(1)) * 60 + GAP_SLACK_SECS
}

/// Most recent rows plus a few aggregates over them.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifySummary {
    pub total: i64,
    /// Newest first.
    pub rows: Vec<StoredMeasurement>,
    /// `(oldest, newest)` departure timestamps among `rows`.
    pub range: Option<(i64, i64)>,
    pub average_minutes: Option<f64>,
}

pub async fn verify(db: &MeasurementDb, limit: u32) -> Result<VerifySummary> {
    let total = db.count().await?;
    let rows = db.recent(limit).await?;
    Ok(summarize_recent(total, rows))
}

pub fn summarize_recent(total: i64, rows: Vec<StoredMeasurement>) -> VerifySummary {
    let range = time_range(&rows);
    let average_minutes = mean(rows.iter().map(|r| r.travel_time_minutes));
    VerifySummary {
        total,
        rows,
        range,
        average_minutes,
    }
}

/// Interval between two consecutive measurements of the same route.
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    pub from_coords: String,
    pub to_coords: String,
    pub start: i64,
    pub end: i64,
}

impl Gap {
    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    /// Stored civil date, `YYYY-MM-DD`.
    pub date: String,
    pub count: usize,
    /// Rounded to one decimal.
    pub mean_minutes: f64,
    pub min_minutes: i64,
    pub max_minutes: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Collection cadence the report was computed against.
    pub interval_minutes: u32,
    pub total: usize,
    pub first: i64,
    pub last: i64,
    pub expected_records: i64,
    pub average_minutes: f64,
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub gaps: Vec<Gap>,
    pub daily: Vec<DailyStats>,
}

pub async fn analyze_db(db: &MeasurementDb, interval_minutes: u32) -> Result<Option<Analysis>> {
    let rows = db.all_ordered().await?;
    Ok(analyze(&rows, interval_minutes))
}

/// Full report over `rows` collected every `interval_minutes`.
/// `None` when there is nothing to analyze.
pub fn analyze(rows: &[StoredMeasurement], interval_minutes: u32) -> Option<Analysis> {
    let interval_minutes = interval_minutes.max(1);
    let (first, last) = time_range(rows)?;
    let minutes = || rows.iter().map(|r| r.travel_time_minutes);

    Some(Analysis {
        interval_minutes,
        total: rows.len(),
        first,
        last,
        expected_records: (last - first) / (i64::from(interval_minutes) * 60),
        average_minutes: mean(minutes())?,
        min_minutes: minutes().min()?,
        max_minutes: minutes().max()?,
        gaps: find_gaps(rows, gap_threshold_secs(interval_minutes)),
        daily: daily_stats(rows),
    })
}

/// Gaps longer than `threshold_secs`, per route, ordered by start time.
pub fn find_gaps(rows: &[StoredMeasurement], threshold_secs: i64) -> Vec<Gap> {
    let mut by_route: HashMap<(&str, &str), Vec<i64>> = HashMap::new();
    for row in rows {
        by_route.entry(row.route_key()).or_default().push(row.timestamp);
    }

    let mut gaps = Vec::new();
    for ((from, to), mut stamps) in by_route {
        stamps.sort_unstable();
        for pair in stamps.windows(2) {
            if pair[1] - pair[0] > threshold_secs {
                gaps.push(Gap {
                    from_coords: from.to_string(),
                    to_coords: to.to_string(),
                    start: pair[0],
                    end: pair[1],
                });
            }
        }
    }
    gaps.sort_by(|a, b| {
        (a.start, &a.from_coords, &a.to_coords).cmp(&(b.start, &b.from_coords, &b.to_coords))
    });
    gaps
}

/// Per-date count / mean / min / max of travel minutes, ordered by date.
pub fn daily_stats(rows: &[StoredMeasurement]) -> Vec<DailyStats> {
    let mut by_date: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for row in rows {
        by_date
            .entry(row.date.as_str())
            .or_default()
            .push(row.travel_time_minutes);
    }

    by_date
        .into_iter()
        .filter_map(|(date, minutes)| {
            Some(DailyStats {
                date: date.to_string(),
                count: minutes.len(),
                mean_minutes: round1(mean(minutes.iter().copied())?),
                min_minutes: *minutes.iter().min()?,
                max_minutes: *minutes.iter().max()?,
            })
        })
        .collect()
}

fn time_range(rows: &[StoredMeasurement]) -> Option<(i64, i64)> {
    let first = rows.iter().map(|r| r.timestamp).min()?;
    let last = rows.iter().map(|r| r.timestamp).max()?;
    Some((first, last))
}

fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, n) = values.fold((0i64, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum as f64 / n as f64)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
