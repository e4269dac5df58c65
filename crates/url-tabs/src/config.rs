//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::endpoint::{Endpoint, EndpointMask, EndpointRegistry};

/// Endpoint list used when `URL_TABS_ENDPOINTS` is unset.
const DEFAULT_ENDPOINTS: &str = "tab:all";

/// Site URL used when `URL_TABS_SITE_URL` is unset.
const DEFAULT_SITE_URL: &str = "http://localhost";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Registered endpoints in priority order (from `URL_TABS_ENDPOINTS`,
    /// `name[:mask|mask],…`; default: `tab:all`).
    pub endpoints: Vec<Endpoint>,

    /// Public site URL, prefixed to request paths in the editor snapshot
    /// (default: `http://localhost`).
    pub site_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoints = lookup("URL_TABS_ENDPOINTS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINTS.to_string());
        let endpoints =
            parse_endpoints(&endpoints).context("URL_TABS_ENDPOINTS is not a valid endpoint list")?;

        let site_url = lookup("URL_TABS_SITE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        Ok(Self {
            endpoints,
            site_url,
        })
    }

    /// Build the endpoint registry.
    pub fn registry(&self) -> Result<EndpointRegistry> {
        EndpointRegistry::from_endpoints(self.endpoints.clone())
            .context("failed to build endpoint registry")
    }

    /// Absolute URL of a request path on this site.
    pub fn page_url(&self, request_uri: &str) -> String {
        format!("{}/{}", self.site_url, request_uri.trim_start_matches('/'))
    }
}

/// Parse `name[:mask|mask],…`. A missing mask means all page types.
pub fn parse_endpoints(list: &str) -> Result<Vec<Endpoint>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<Endpoint> {
            let (name, mask) = match entry.split_once(':') {
                Some((name, mask)) => (
                    name.trim(),
                    mask.parse::<EndpointMask>()
                        .with_context(|| format!("invalid mask for endpoint '{}'", name.trim()))?,
                ),
                None => (entry, EndpointMask::ALL),
            };
            let endpoint = Endpoint::new(name, mask);
            endpoint
                .validate()
                .with_context(|| format!("invalid endpoint '{entry}'"))?;
            Ok(endpoint)
        })
        .collect()
}
