use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryPolicy;

/// TomTom Routing API `calculateRoute` endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.tomtom.com/routing/1/calculateRoute";

/// Environment variable holding the routing API key. Takes precedence over `api_key` in the file.
pub const API_KEY_ENV: &str = "TOMTOM_API_KEY";

/// Startup configuration problems. All of these are fatal; nothing is retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("routing API key not set (export {} or set api_key in config.toml)", API_KEY_ENV)]
    MissingApiKey,
    #[error("no routes configured")]
    NoRoutes,
    #[error("route {name:?}: invalid coordinates {coords:?} (expected \"lat,lon\")")]
    InvalidCoords { name: String, coords: String },
    #[error("route {name:?} has the same origin and destination as route {other:?}")]
    DuplicateRoute { name: String, other: String },
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("schedule.interval_minutes must be a non-zero divisor of 60 (got {0})")]
    InvalidInterval(u32),
    #[error("invalid api_base_url {0:?}")]
    InvalidBaseUrl(String),
}

/// One origin/destination pair to monitor. Identity is (from_coords, to_coords).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Human label used in logs.
    pub name: String,
    /// Origin as "lat,lon".
    pub from_coords: String,
    /// Destination as "lat,lon".
    pub to_coords: String,
}

impl RouteDefinition {
    pub fn new(name: &str, from_coords: &str, to_coords: &str) -> Self {
        Self {
            name: name.to_string(),
            from_coords: from_coords.to_string(),
            to_coords: to_coords.to_string(),
        }
    }

    pub fn identity(&self) -> (&str, &str) {
        (&self.from_coords, &self.to_coords)
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between attempts.
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 5,
        }
    }
}

/// Collection cadence (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cycles fire at wall-clock minutes that are multiples of this value.
    pub interval_minutes: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Global configuration loaded from `~/.config/routewatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteWatchConfig {
    /// Base URL of the routing endpoint; `{from}:{to}/json` is appended.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// API key; only consulted when `TOMTOM_API_KEY` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Routes polled on every cycle.
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional schedule; if missing, cycles fire every 5 minutes.
    #[serde(default)]
    pub schedule: Option<ScheduleConfig>,
    /// Overall timeout per API request in seconds (None = libcurl defaults).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Log file (None = `~/.local/state/routewatch/routewatch.log`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// SQLite database (None = `~/.local/state/routewatch/routes.db`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl Default for RouteWatchConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            routes: vec![RouteDefinition::new(
                "Dubai Route 1",
                "24.996083,55.375999",
                "25.250287,55.337958",
            )],
            retry: None,
            schedule: None,
            request_timeout_secs: None,
            log_file: None,
            database_path: None,
        }
    }
}

impl RouteWatchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        let retry = self.retry.clone().unwrap_or_default();
        RetryPolicy {
            max_attempts: retry.max_attempts,
            delay: Duration::from_secs(retry.delay_secs),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn interval_minutes(&self) -> u32 {
        self.schedule
            .as_ref()
            .map(|s| s.interval_minutes)
            .unwrap_or_else(|| ScheduleConfig::default().interval_minutes)
    }

    /// Resolve the API key from the environment, falling back to the file.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key_from(&self, env_value: Option<String>) -> Result<String, ConfigError> {
        env_value
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Check routes, retry, and schedule settings before anything is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }
        let mut seen: HashMap<(&str, &str), &str> = HashMap::new();
        for route in &self.routes {
            for coords in [&route.from_coords, &route.to_coords] {
                if parse_coords(coords).is_none() {
                    return Err(ConfigError::InvalidCoords {
                        name: route.name.clone(),
                        coords: coords.clone(),
                    });
                }
            }
            if let Some(other) = seen.insert(route.identity(), &route.name) {
                return Err(ConfigError::DuplicateRoute {
                    name: route.name.clone(),
                    other: other.to_string(),
                });
            }
        }
        if self.retry.as_ref().is_some_and(|r| r.max_attempts == 0) {
            return Err(ConfigError::ZeroAttempts);
        }
        let interval = self.interval_minutes();
        if interval == 0 || 60 % interval != 0 {
            return Err(ConfigError::InvalidInterval(interval));
        }
        Ok(())
    }
}

/// Parse a "lat,lon" string. Returns None unless both parts are in range.
pub fn parse_coords(s: &str) -> Option<(f64, f64)> {
    let (lat, lon) = s.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some((lat, lon))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("routewatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Path of a file under the routewatch XDG state directory (parent is created).
pub fn state_file(name: &str) -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("routewatch")?;
    Ok(xdg_dirs.place_state_file(name)?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RouteWatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RouteWatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<RouteWatchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: RouteWatchConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}
