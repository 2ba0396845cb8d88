//! Routing API access.
//!
//! `RouteSource` is the raw network capability (coordinates in, body out);
//! `TomTomClient` implements it with libcurl. `RouteFetcher` wraps any source
//! with the retry policy and turns the body into a typed `RoutingResponse`.

mod client;
mod response;

pub use client::TomTomClient;
pub use response::{parse_response, ParseError, Route, RouteSummary, RoutingResponse};

use crate::config::RouteDefinition;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// One blocking request to the routing API for a coordinate pair.
///
/// Returns the response body for a 2xx status; transport failures and other
/// statuses are reported as `FetchError::Curl` / `FetchError::Http`.
pub trait RouteSource: Send + Sync {
    fn request(&self, from_coords: &str, to_coords: &str) -> Result<String, FetchError>;
}

/// A route source plus the retry budget applied to every fetch.
pub struct RouteFetcher<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: RouteSource> RouteFetcher<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch and parse the route summary for `route`.
    ///
    /// Network failures are retried up to `policy.max_attempts` with the fixed
    /// delay in between; a 2xx body that does not parse fails immediately.
    /// Runs in the current thread; call from `spawn_blocking` in async code.
    pub fn fetch(&self, route: &RouteDefinition) -> Result<RoutingResponse, FetchError> {
        run_with_retry(&self.policy, &route.name, |_attempt| {
            let body = self.source.request(&route.from_coords, &route.to_coords)?;
            Ok(parse_response(&body)?)
        })
    }
}
