//! Tab link URLs and active-tab detection.
//!
//! Every tab link is built from the current request's base URL (the path
//! with any registered endpoint segment stripped). A tab is active when its
//! URL is exactly the current path, ignoring trailing slashes, which gives
//! home, base and value tabs one uniform rule.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::endpoint::effective_endpoint_name;
use crate::request::{RequestContext, trailingslashit, untrailingslashit};
use crate::resolver::find_segment;
use crate::slug::normalize_slug;

/// The three navigation-link variations that act as tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabKind {
    /// `/base/endpoint/slug/`
    Tab,
    /// `/base/`
    TabHome,
    /// `/base/endpoint/`
    TabBase,
}

impl TabKind {
    pub const ALL: [TabKind; 3] = [TabKind::TabHome, TabKind::TabBase, TabKind::Tab];

    /// Parse a block `kind` attribute. Anything else is not a tab link.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "tab" => Some(Self::Tab),
            "tab-home" => Some(Self::TabHome),
            "tab-base" => Some(Self::TabBase),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::TabHome => "tab-home",
            Self::TabBase => "tab-base",
        }
    }
}

/// A tab link as configured on a navigation-link block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    pub kind: TabKind,
    /// Endpoint name as configured; may be blank.
    pub endpoint_name: String,
    /// Raw slug, before normalization.
    pub slug: String,
    pub label: String,
}

impl TabDescriptor {
    pub fn new(kind: TabKind, endpoint_name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            kind,
            endpoint_name: endpoint_name.into(),
            slug: slug.into(),
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Read a descriptor from navigation-link block attributes
    /// (`kind`, `tabEndpoint`, `url`, `label`).
    ///
    /// Returns `None` when the block is not one of the tab kinds.
    pub fn from_attributes(attrs: &Value) -> Option<Self> {
        let kind = attrs.get("kind").and_then(Value::as_str).and_then(TabKind::parse)?;
        let text = |key: &str| {
            attrs
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        };

        Some(Self {
            kind,
            endpoint_name: text("tabEndpoint"),
            slug: text("url"),
            label: text("label"),
        })
    }

    /// Endpoint name with the `tab` default applied.
    pub fn effective_endpoint(&self) -> &str {
        effective_endpoint_name(&self.endpoint_name)
    }

    pub fn normalized_slug(&self) -> String {
        normalize_slug(&self.slug)
    }
}

/// Computed destination of a tab link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabLink {
    pub url: String,
    pub is_active: bool,
}

/// Base URL of the current request: the path truncated before the first
/// registered endpoint segment (registration order), with a trailing slash.
///
/// Every registered endpoint is scanned, not only the one a tab uses, so a
/// home tab on one endpoint still finds the shared base while another
/// endpoint is active.
pub fn base_url(ctx: &RequestContext) -> String {
    let path = ctx.path();
    let haystack = trailingslashit(path);

    ctx.registry()
        .names()
        .find_map(|name| find_segment(path, name))
        .map(|pos| trailingslashit(&haystack[..pos]))
        .unwrap_or(haystack)
}

/// Builds tab URLs for one request.
#[derive(Debug, Clone)]
pub struct TabUrlBuilder<'a> {
    ctx: &'a RequestContext,
    base: String,
}

impl<'a> TabUrlBuilder<'a> {
    pub fn new(ctx: &'a RequestContext) -> Self {
        Self {
            ctx,
            base: base_url(ctx),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// URL for a tab, without active detection.
    pub fn url_for(&self, tab: &TabDescriptor) -> String {
        let endpoint = tab.effective_endpoint();
        match tab.kind {
            TabKind::TabHome => self.base.clone(),
            TabKind::TabBase => format!("{}{endpoint}/", self.base),
            TabKind::Tab => {
                let slug = tab.normalized_slug();
                if slug.is_empty() {
                    format!("{}{endpoint}/", self.base)
                } else {
                    format!("{}{endpoint}/{slug}/", self.base)
                }
            }
        }
    }

    /// Build the tab URL and decide whether it is the current page.
    pub fn build(&self, tab: &TabDescriptor) -> TabLink {
        let url = self.url_for(tab);
        let is_active = untrailingslashit(&url) == untrailingslashit(self.ctx.path());

        debug!(
            kind = tab.kind.as_str(),
            endpoint = %tab.effective_endpoint(),
            url = %url,
            active = is_active,
            "tab link built"
        );

        TabLink { url, is_active }
    }
}
