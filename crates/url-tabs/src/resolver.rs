//! Endpoint value resolution.
//!
//! Resolution is three-state:
//! - `None`: the endpoint is not in the URL at all
//! - `Some("")`: the endpoint segment is present with no value (`/tab/`)
//! - `Some(value)`: the endpoint carries a value (`/tab/general/`)

use tracing::trace;

use crate::endpoint::{Endpoint, effective_endpoint_name};
use crate::request::{RequestContext, trailingslashit};

/// Byte offset of the bounded `/name/` segment in `path`, if present.
///
/// The path is searched with a trailing slash appended so that `/page/tab`
/// and `/page/tab/` both contain the segment.
pub(crate) fn find_segment(path: &str, name: &str) -> Option<usize> {
    let haystack = trailingslashit(path);
    haystack.find(&format!("/{name}/"))
}

/// Resolves endpoint values against one request.
#[derive(Debug, Clone, Copy)]
pub struct EndpointResolver<'a> {
    ctx: &'a RequestContext,
}

impl<'a> EndpointResolver<'a> {
    pub fn new(ctx: &'a RequestContext) -> Self {
        Self { ctx }
    }

    /// Current value of the named endpoint.
    ///
    /// Looks for the `/name/` segment in the path; the value is everything
    /// after it with surrounding slashes trimmed. When the segment is absent
    /// a non-empty query variable of the same name is used instead.
    pub fn resolve(&self, endpoint_name: &str) -> Option<String> {
        let name = effective_endpoint_name(endpoint_name);
        let path = self.ctx.path();

        if let Some(pos) = find_segment(path, name) {
            let haystack = trailingslashit(path);
            let value = haystack[pos + name.len() + 2..].trim_matches('/').to_string();
            trace!(endpoint = %name, value = %value, "endpoint resolved from path");
            return Some(value);
        }

        let value = self.ctx.query_var(name).filter(|v| !v.is_empty());
        if value.is_some() {
            trace!(endpoint = %name, "endpoint resolved from query variable");
        }
        value
    }

    /// Whether the endpoint resolves to anything (including the empty value).
    pub fn is_active(&self, endpoint_name: &str) -> bool {
        self.resolve(endpoint_name).is_some()
    }

    /// Whether any registered endpoint is active on this request.
    pub fn any_active(&self) -> bool {
        self.ctx.registry().names().any(|name| self.is_active(name))
    }

    /// First active registered endpoint (registration order) and its value.
    pub fn active(&self) -> Option<(&'a Endpoint, String)> {
        self.ctx
            .registry()
            .iter()
            .find_map(|endpoint| self.resolve(&endpoint.name).map(|value| (endpoint, value)))
    }
}
