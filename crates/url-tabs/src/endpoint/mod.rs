//! Rewrite endpoints and the ordered registry that holds them.
//!
//! An endpoint is a named path segment (e.g. `/tab/`) that marks a
//! sub-resource of the current page. Registration order is priority order
//! when stripping endpoint segments from a URL.

mod mask;
mod registry;

pub use mask::EndpointMask;
pub use registry::{EndpointHook, EndpointRegistry, RegistryBuilder};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Endpoint name used when a block or rule leaves it blank.
pub const DEFAULT_ENDPOINT: &str = "tab";

/// Return `name`, or the default endpoint when it is blank.
pub fn effective_endpoint_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_ENDPOINT
    } else {
        trimmed
    }
}

/// A registered rewrite endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// URL segment, e.g. `tab`.
    pub name: String,
    /// Page types the endpoint is registered for.
    #[serde(default)]
    pub mask: EndpointMask,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, mask: EndpointMask) -> Self {
        Self {
            name: name.into(),
            mask,
        }
    }

    /// Validate that the name can be used as a single URL path segment.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::EmptyEndpointName);
        }
        let url_safe = self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !url_safe {
            return Err(Error::InvalidEndpointName(self.name.clone()));
        }
        Ok(())
    }

    /// Whether this endpoint applies to any of the given page types.
    pub fn applies_to(&self, page: EndpointMask) -> bool {
        self.mask.intersects(page)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, EndpointMask::ALL)
    }
}
