//! Collection cycle: fetch → normalize → persist for every configured route.
//!
//! Each route is isolated: a failure is logged and the cycle moves on to the
//! next route. Network I/O finishes before the storage transaction opens.

use std::sync::Arc;
use thiserror::Error;

use crate::config::RouteDefinition;
use crate::normalize::normalize;
use crate::retry::FetchError;
use crate::routing::{ParseError, RouteFetcher, RouteSource};
use crate::store::{MeasurementDb, MeasurementId, NewMeasurement, PersistenceError};

/// Why one route produced no record in a cycle.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("normalize failed: {0}")]
    Normalize(#[from] ParseError),
    #[error(transparent)]
    Persist(#[from] PersistenceError),
    #[error("fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug)]
pub struct RouteFailure {
    pub route: String,
    pub error: CollectError,
}

/// Outcome of one cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<RouteFailure>,
}

impl CycleReport {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }
}

/// Runs collection cycles over a fixed route list.
pub struct Collector<S> {
    fetcher: Arc<RouteFetcher<S>>,
    db: MeasurementDb,
    routes: Vec<RouteDefinition>,
}

impl<S: RouteSource + 'static> Collector<S> {
    pub fn new(fetcher: RouteFetcher<S>, db: MeasurementDb, routes: Vec<RouteDefinition>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            db,
            routes,
        }
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// One pass over all routes. Never fails; per-route errors are in the report.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport {
            attempted: self.routes.len(),
            ..CycleReport::default()
        };
        tracing::info!("starting data collection for {} routes", report.attempted);

        for route in &self.routes {
            tracing::info!(route = %route.name, "collecting data");
            match self.collect_route(route).await {
                Ok(id) => {
                    report.succeeded += 1;
                    tracing::info!(route = %route.name, id, "saved route data");
                }
                Err(error) => {
                    tracing::error!(route = %route.name, "failed to collect route data: {}", error);
                    report.failures.push(RouteFailure {
                        route: route.name.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "data collection completed: {}/{} routes succeeded",
            report.succeeded,
            report.attempted
        );
        report
    }

    /// Fetch, normalize, and persist a single route.
    pub async fn collect_route(&self, route: &RouteDefinition) -> Result<MeasurementId, CollectError> {
        let response = tokio::task::spawn_blocking({
            let fetcher = Arc::clone(&self.fetcher);
            let route = route.clone();
            move || fetcher.fetch(&route)
        })
        .await??;

        let measurement = normalize(&response)?;
        let new = NewMeasurement::for_route(route, measurement);
        Ok(self.db.insert_measurement(&new).await?)
    }
}
