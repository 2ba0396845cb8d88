//! One-second countdown line to the next boundary. Display only.

use chrono::{DateTime, FixedOffset};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::boundary::{next_boundary, time_until};
use super::clock::Clock;

/// `Next run at HH:MM:SS (in MM:SS)`.
pub fn format_countdown(now: &DateTime<FixedOffset>, next: &DateTime<FixedOffset>) -> String {
    let left = time_until(now, next).as_secs();
    format!(
        "Next run at {} (in {:02}:{:02})",
        next.format("%H:%M:%S"),
        left / 60,
        left % 60
    )
}

/// Rewrite the countdown line on `out` every second until `shutdown` turns true
/// (or its sender is dropped). Returns the writer.
///
/// Computes the boundary on its own from `clock`, independent of the
/// scheduler, so a late tick only shows a stale line.
pub async fn run_countdown<W: Write + Send>(
    clock: Arc<dyn Clock>,
    interval_minutes: u32,
    mut shutdown: watch::Receiver<bool>,
    mut out: W,
) -> W {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                let now = clock.now();
                let next = next_boundary(&now, interval_minutes);
                // Display errors are ignored.
                let _ = write!(out, "\r{}", format_countdown(&now, &next));
                let _ = out.flush();
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    let _ = writeln!(out);
    out
}
