//! CLI command handlers, one file per command.

mod analyze;
mod collect;
mod routes;
mod run;
mod verify;

pub use analyze::run_analyze;
pub use collect::run_collect;
pub use routes::run_routes;
pub use run::run_scheduler;
pub use verify::run_verify;

use anyhow::Result;
use routewatch_core::collector::Collector;
use routewatch_core::config::RouteWatchConfig;
use routewatch_core::routing::{RouteFetcher, TomTomClient};
use routewatch_core::store::MeasurementDb;

/// Client, store, and collector wired from config.
pub(crate) async fn build_collector(cfg: &RouteWatchConfig) -> Result<Collector<TomTomClient>> {
    let api_key = cfg.resolve_api_key()?;
    let client =
        TomTomClient::new(&cfg.api_base_url, &api_key)?.with_timeout(cfg.request_timeout());
    let db = MeasurementDb::open(cfg.database_path.as_deref()).await?;
    let fetcher = RouteFetcher::new(client, cfg.retry_policy());
    Ok(Collector::new(fetcher, db, cfg.routes.clone()))
}
