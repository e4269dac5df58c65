//! Editor-side data contract and derivations.
//!
//! The block editor receives a read-only [`EditorSnapshot`] at load time and
//! derives everything else (tab lists, visibility controls) from the current
//! block tree on every change. Nothing here keeps incremental state except
//! [`TabCatalog`], which memoizes by the tree it was derived from.

mod panel;
mod tabs;

pub use panel::{SelectOption, VisibilityPanel, visibility_indicator_class, visibility_panel};
pub use tabs::{EditorBlock, TabCatalog, TabSummary, collect_tabs};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::block::NAVIGATION_LINK;
use crate::endpoint::{DEFAULT_ENDPOINT, Endpoint, EndpointRegistry};
use crate::error::Result;
use crate::tab::TabKind;
use crate::visibility::{VISIBILITY_ATTRIBUTE, VisibilityRule};

/// Class the editor adds to blocks with a conditional visibility rule.
pub const VISIBILITY_INDICATOR_CLASS: &str = "wp-block-has-hm-tab-visibility";

/// Registry and current page URL, serialized once for the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub endpoints: Vec<Endpoint>,
    pub current_url: String,
}

impl EditorSnapshot {
    pub fn new(registry: &EndpointRegistry, current_url: impl Into<String>) -> Self {
        Self {
            endpoints: registry.iter().cloned().collect(),
            current_url: current_url.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Rebuild the registry the snapshot was taken from.
    pub fn registry(&self) -> Result<EndpointRegistry> {
        EndpointRegistry::from_endpoints(self.endpoints.clone())
    }
}

/// An inserter variation of the navigation-link block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVariation {
    pub name: String,
    pub title: String,
    pub description: String,
    pub attributes: Value,
    /// Attributes that identify a block as this variation.
    pub is_active: Vec<String>,
    pub scope: Vec<String>,
}

impl BlockVariation {
    fn for_kind(kind: TabKind, title: &str, description: &str, endpoint: &str) -> Self {
        Self {
            name: kind.as_str().into(),
            title: title.into(),
            description: description.into(),
            attributes: json!({
                "kind": kind.as_str(),
                "tabEndpoint": endpoint,
                "url": "",
            }),
            is_active: vec!["kind".into()],
            scope: vec!["inserter".into()],
        }
    }
}

/// The three tab variations offered for navigation links.
pub fn navigation_link_variations() -> Vec<BlockVariation> {
    vec![
        BlockVariation::for_kind(
            TabKind::TabHome,
            "Home Tab",
            "A tab link to the current page without any endpoint value.",
            "",
        ),
        BlockVariation::for_kind(
            TabKind::TabBase,
            "Base Tab",
            "A tab link to the endpoint without a value (e.g., /tab/).",
            DEFAULT_ENDPOINT,
        ),
        BlockVariation::for_kind(
            TabKind::Tab,
            "Tab",
            "A tab link with a rewrite endpoint for conditional content display.",
            DEFAULT_ENDPOINT,
        ),
    ]
}

/// Fill in the attributes this system adds to blocks, leaving any existing
/// values untouched.
///
/// Navigation links get `tabEndpoint`; every other block gets a default
/// `hmUrlTabVisibility` rule.
pub fn apply_attribute_defaults(block_name: &str, attrs: &mut Map<String, Value>) {
    if block_name == NAVIGATION_LINK {
        attrs
            .entry("tabEndpoint")
            .or_insert_with(|| Value::String(DEFAULT_ENDPOINT.into()));
        return;
    }

    attrs
        .entry(VISIBILITY_ATTRIBUTE)
        .or_insert_with(|| serde_json::to_value(VisibilityRule::default()).unwrap_or_default());
}
