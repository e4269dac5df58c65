//! Tab discovery over the editor's block tree.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::NAVIGATION_LINK;
use crate::endpoint::effective_endpoint_name;
use crate::slug::normalize_slug;
use crate::tab::{TabDescriptor, TabKind};

/// A block as seen by the editor: identity, attributes and children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorBlock {
    pub client_id: String,
    pub name: String,
    #[serde(default = "empty_attributes")]
    pub attributes: Value,
    #[serde(default)]
    pub inner_blocks: Vec<EditorBlock>,
}

fn empty_attributes() -> Value {
    Value::Object(Map::new())
}

impl EditorBlock {
    pub fn new(client_id: impl Into<String>, name: impl Into<String>, attributes: Value) -> Self {
        Self {
            client_id: client_id.into(),
            name: name.into(),
            attributes,
            inner_blocks: Vec::new(),
        }
    }

    pub fn with_inner_blocks(mut self, inner_blocks: Vec<EditorBlock>) -> Self {
        self.inner_blocks = inner_blocks;
        self
    }

    pub fn is_navigation_link(&self) -> bool {
        self.name == NAVIGATION_LINK
    }
}

/// A tab link found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub label: String,
    /// Raw slug as entered on the link.
    pub url: String,
    /// Endpoint name with the `tab` default applied.
    pub endpoint: String,
    pub kind: TabKind,
}

impl TabSummary {
    pub fn is_home(&self) -> bool {
        self.kind == TabKind::TabHome
    }

    pub fn is_base(&self) -> bool {
        self.kind == TabKind::TabBase
    }

    fn key(&self) -> (String, String, TabKind) {
        (self.endpoint.clone(), normalize_slug(&self.url), self.kind)
    }
}

/// All tab links in document order, de-duplicated by endpoint, normalized
/// slug and kind.
pub fn collect_tabs(blocks: &[EditorBlock]) -> Vec<TabSummary> {
    let mut seen = HashSet::new();
    let mut tabs = Vec::new();
    collect_into(blocks, &mut seen, &mut tabs);
    tabs
}

fn collect_into(
    blocks: &[EditorBlock],
    seen: &mut HashSet<(String, String, TabKind)>,
    tabs: &mut Vec<TabSummary>,
) {
    for block in blocks {
        if block.is_navigation_link() {
            if let Some(tab) = TabDescriptor::from_attributes(&block.attributes) {
                let summary = TabSummary {
                    endpoint: effective_endpoint_name(&tab.endpoint_name).to_string(),
                    label: tab.label,
                    url: tab.slug,
                    kind: tab.kind,
                };
                if seen.insert(summary.key()) {
                    tabs.push(summary);
                }
            }
        }
        collect_into(&block.inner_blocks, seen, tabs);
    }
}

/// Memoized [`collect_tabs`].
///
/// The cached list is replaced, never edited, whenever the block tree
/// differs from the one it was derived from.
#[derive(Debug, Default)]
pub struct TabCatalog {
    source: Option<Vec<EditorBlock>>,
    tabs: Arc<[TabSummary]>,
}

impl TabCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabs for `blocks`, recomputed only when the tree changed.
    pub fn tabs(&mut self, blocks: &[EditorBlock]) -> Arc<[TabSummary]> {
        if self.source.as_deref() != Some(blocks) {
            self.tabs = collect_tabs(blocks).into();
            self.source = Some(blocks.to_vec());
        }
        Arc::clone(&self.tabs)
    }
}
