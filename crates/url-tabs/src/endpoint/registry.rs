//! Endpoint registry - the ordered set of endpoints known for a request.
//!
//! The registry is built once (from configuration plus any registration
//! hooks) and is read-only afterwards. Names are unique; iteration order is
//! registration order.

use tracing::debug;

use super::{Endpoint, EndpointMask};
use crate::error::{Error, Result};

/// Extension point that may add, remove or reorder endpoints before the
/// registry is validated.
pub trait EndpointHook: Send + Sync {
    /// Hook name for debugging.
    fn name(&self) -> &str;

    /// Adjust the endpoint list in place.
    fn register(&self, endpoints: &mut Vec<Endpoint>);
}

/// Ordered, duplicate-free list of registered endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    /// Build a registry from an endpoint list.
    ///
    /// An empty list yields the default registry (a single `tab` endpoint).
    pub fn from_endpoints(endpoints: Vec<Endpoint>) -> Result<Self> {
        if endpoints.is_empty() {
            return Ok(Self::default());
        }

        let mut registry = Self {
            endpoints: Vec::with_capacity(endpoints.len()),
        };
        for endpoint in endpoints {
            registry.register(endpoint)?;
        }
        Ok(registry)
    }

    /// Start a builder seeded with the default endpoint.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Append an endpoint, rejecting invalid or duplicate names.
    pub fn register(&mut self, endpoint: Endpoint) -> Result<()> {
        endpoint.validate()?;
        if self.contains(&endpoint.name) {
            return Err(Error::DuplicateEndpoint(endpoint.name));
        }
        self.endpoints.push(endpoint);
        Ok(())
    }

    /// Endpoints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    /// Endpoint names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Narrow the registry to endpoints registered for the given page type.
    ///
    /// The result keeps registration order and may be empty, in which case
    /// no endpoint resolves on that page.
    pub fn scoped(&self, page: EndpointMask) -> Self {
        Self {
            endpoints: self
                .endpoints
                .iter()
                .filter(|e| e.applies_to(page))
                .cloned()
                .collect(),
        }
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self {
            endpoints: vec![Endpoint::default()],
        }
    }
}

/// Builder that runs registration hooks over a starting endpoint list.
pub struct RegistryBuilder {
    endpoints: Vec<Endpoint>,
    hooks: Vec<Box<dyn EndpointHook>>,
}

impl RegistryBuilder {
    /// Create a builder seeded with the default `tab` endpoint.
    pub fn new() -> Self {
        Self {
            endpoints: vec![Endpoint::default()],
            hooks: Vec::new(),
        }
    }

    /// Replace the starting endpoint list.
    pub fn endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Append an endpoint to the starting list.
    pub fn endpoint(mut self, name: impl Into<String>, mask: EndpointMask) -> Self {
        self.endpoints.push(Endpoint::new(name, mask));
        self
    }

    /// Add a registration hook. Hooks run in the order they are added.
    pub fn hook<H: EndpointHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Run all hooks and validate the result.
    pub fn build(self) -> Result<EndpointRegistry> {
        let mut endpoints = self.endpoints;
        for hook in &self.hooks {
            hook.register(&mut endpoints);
            debug!(hook = %hook.name(), endpoints = endpoints.len(), "endpoint hook applied");
        }
        EndpointRegistry::from_endpoints(endpoints)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
