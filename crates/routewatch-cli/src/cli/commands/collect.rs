//! `routewatch collect` – one collection cycle, now.

use anyhow::{bail, Result};
use routewatch_core::config::RouteWatchConfig;

use super::build_collector;

pub async fn run_collect(cfg: &RouteWatchConfig) -> Result<()> {
    let collector = build_collector(cfg).await?;
    let report = collector.run_cycle().await;
    println!(
        "Collected {}/{} routes.",
        report.succeeded, report.attempted
    );
    for failure in &report.failures {
        println!("  {}: {}", failure.route, failure.error);
    }
    if report.succeeded == 0 && report.attempted > 0 {
        bail!("no route could be collected");
    }
    Ok(())
}
