//! Per-request inputs shared by every tab and visibility evaluation.
//!
//! A [`RequestContext`] is built once per request from the raw request URI
//! and the endpoint registry, and is read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::endpoint::EndpointRegistry;

/// Host-supplied query variable lookup, consulted when an endpoint is not
/// present as a path segment.
pub trait QueryVars: Send + Sync {
    fn query_var(&self, name: &str) -> Option<String>;
}

impl QueryVars for HashMap<String, String> {
    fn query_var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Immutable per-request state: the request path, the registry snapshot and
/// the query variables.
#[derive(Clone)]
pub struct RequestContext {
    path: String,
    registry: Arc<EndpointRegistry>,
    query: HashMap<String, String>,
    external: Option<Arc<dyn QueryVars>>,
}

impl RequestContext {
    /// Build a context from a raw request URI such as `/page/tab/one/?x=1`.
    ///
    /// The path is everything before the first `?` or `#`. A malformed path
    /// is treated as empty.
    pub fn new(request_uri: &str, registry: impl Into<Arc<EndpointRegistry>>) -> Self {
        let (path, query) = match request_uri.split_once('?') {
            Some((path, rest)) => (path, rest.split('#').next().unwrap_or("")),
            None => (request_uri, ""),
        };

        Self {
            path: sanitize_path(path),
            registry: registry.into(),
            query: parse_query(query),
            external: None,
        }
    }

    /// Attach a host query variable lookup. It is consulted before the
    /// request's own query string.
    pub fn with_query_vars(mut self, vars: impl QueryVars + 'static) -> Self {
        self.external = Some(Arc::new(vars));
        self
    }

    /// Request path without query string or fragment.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Look up a query variable, host lookup first.
    pub fn query_var(&self, name: &str) -> Option<String> {
        self.external
            .as_ref()
            .and_then(|vars| vars.query_var(name))
            .or_else(|| self.query.get(name).cloned())
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("path", &self.path)
            .field("registry", &self.registry)
            .field("query", &self.query)
            .field("external", &self.external.is_some())
            .finish()
    }
}

/// Append a single trailing slash. `""` becomes `"/"`.
pub fn trailingslashit(s: &str) -> String {
    format!("{}/", untrailingslashit(s))
}

/// Strip all trailing slashes.
pub fn untrailingslashit(s: &str) -> &str {
    s.trim_end_matches('/')
}

fn sanitize_path(raw: &str) -> String {
    let path = raw.split('#').next().unwrap_or("");
    if path.is_empty() {
        return String::new();
    }
    if !path.starts_with('/') || path.chars().any(|c| c.is_whitespace() || c.is_control()) {
        warn!(path = %path.escape_debug(), "malformed request path, treating as empty");
        return String::new();
    }
    path.to_string()
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key)?;
            let value = decode_component(value)?;
            Some((key, value))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    match urlencoding::decode(&raw.replace('+', " ")) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            warn!(value = %raw, error = %e, "ignoring undecodable query component");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn ctx(uri: &str) -> RequestContext {
        RequestContext::new(uri, EndpointRegistry::default())
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(ctx("/page/tab/one/?preview=true").path(), "/page/tab/one/");
        assert_eq!(ctx("/page/#section").path(), "/page/");
        assert_eq!(ctx("/page/?a=1#frag").path(), "/page/");
    }

    #[test]
    fn malformed_paths_become_empty() {
        assert_eq!(ctx("").path(), "");
        assert_eq!(ctx("page/tab/").path(), "");
        assert_eq!(ctx("https://example.com/page/").path(), "");
        assert_eq!(ctx("/page with space/").path(), "");
        assert_eq!(ctx("/page/\n").path(), "");
    }

    #[test]
    fn parses_and_decodes_query_vars() {
        let context = ctx("/page/?tab=new+arrivals&overview=a%2Fb&flag");
        assert_eq!(context.query_var("tab").as_deref(), Some("new arrivals"));
        assert_eq!(context.query_var("overview").as_deref(), Some("a/b"));
        assert_eq!(context.query_var("flag").as_deref(), Some(""));
        assert_eq!(context.query_var("missing"), None);
    }

    #[test]
    fn host_query_vars_take_precedence() {
        let mut vars = HashMap::new();
        vars.insert("tab".to_string(), "from-host".to_string());
        let context = ctx("/page/?tab=from-uri").with_query_vars(vars);
        assert_eq!(context.query_var("tab").as_deref(), Some("from-host"));
    }

    #[test]
    fn trailing_slash_helpers() {
        assert_eq!(trailingslashit("/products"), "/products/");
        assert_eq!(trailingslashit("/products//"), "/products/");
        assert_eq!(trailingslashit(""), "/");
        assert_eq!(untrailingslashit("/products/"), "/products");
        assert_eq!(untrailingslashit("/"), "");
    }
}
