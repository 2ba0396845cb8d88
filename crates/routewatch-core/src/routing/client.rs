//! TomTom Routing API client over libcurl.

use std::time::Duration;
use url::Url;

use super::RouteSource;
use crate::config::ConfigError;
use crate::retry::FetchError;

/// Blocking client for `calculateRoute`, requesting the route summary only.
#[derive(Debug, Clone)]
pub struct TomTomClient {
    base_url: Url,
    api_key: String,
    timeout: Option<Duration>,
}

impl TomTomClient {
    /// `base_url` is the endpoint without the `{from}:{to}/json` suffix.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: parsed,
            api_key: api_key.to_string(),
            timeout: None,
        })
    }

    /// Overall per-request timeout. Without one, libcurl defaults apply.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full request URL, including the API key. Do not log.
    pub(crate) fn request_url(&self, from_coords: &str, to_coords: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&format!("{}:{}", from_coords, to_coords))
                .push("json");
        }
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("routeRepresentation", "summaryOnly");
        url
    }
}

impl RouteSource for TomTomClient {
    fn request(&self, from_coords: &str, to_coords: &str) -> Result<String, FetchError> {
        let url = self.request_url(from_coords, to_coords);
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.useragent(concat!("routewatch/", env!("CARGO_PKG_VERSION")))?;
        if let Some(timeout) = self.timeout {
            easy.timeout(timeout)?;
        }

        let mut list = curl::easy::List::new();
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
