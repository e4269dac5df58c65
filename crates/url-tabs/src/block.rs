//! Parsed blocks as handed over by the host rendering pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::render::{RenderElement, container};

/// Block name of navigation links.
pub const NAVIGATION_LINK: &str = "core/navigation-link";

/// A block with its attributes, pre-rendered markup tree and inner blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBlock {
    /// Block type name, e.g. `core/group`. Freeform content has none.
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default = "empty_attrs", deserialize_with = "attrs_or_empty")]
    pub attrs: Value,
    #[serde(default = "empty_element")]
    pub element: RenderElement,
    #[serde(default)]
    pub inner_blocks: Vec<ParsedBlock>,
}

impl ParsedBlock {
    pub fn new(block_name: impl Into<String>, attrs: Value, element: RenderElement) -> Self {
        Self {
            block_name: Some(block_name.into()),
            attrs,
            element,
            inner_blocks: Vec::new(),
        }
    }

    pub fn with_inner_blocks(mut self, inner_blocks: Vec<ParsedBlock>) -> Self {
        self.inner_blocks = inner_blocks;
        self
    }

    pub fn name(&self) -> &str {
        self.block_name.as_deref().unwrap_or("")
    }

    pub fn is_navigation_link(&self) -> bool {
        self.name() == NAVIGATION_LINK
    }
}

fn empty_attrs() -> Value {
    Value::Object(Map::new())
}

fn empty_element() -> RenderElement {
    container().build()
}

/// Attributes that are not a JSON object (the host sometimes sends `[]` or
/// `null` for "no attributes") are replaced by an empty object.
fn attrs_or_empty<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(if value.is_object() { value } else { empty_attrs() })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_host_block_json() {
        let block: ParsedBlock = serde_json::from_value(json!({
            "blockName": "core/navigation-link",
            "attrs": { "kind": "tab", "url": "shoes" },
            "element": { "#type": "element", "#tag": "li" },
            "innerBlocks": []
        }))
        .unwrap();
        assert!(block.is_navigation_link());
        assert_eq!(block.attrs["kind"], "tab");
        assert!(block.element.is_tag("li"));
    }

    #[test]
    fn non_object_attrs_become_empty() {
        let block: ParsedBlock =
            serde_json::from_value(json!({ "blockName": null, "attrs": [] })).unwrap();
        assert_eq!(block.name(), "");
        assert_eq!(block.attrs, json!({}));
        assert!(block.inner_blocks.is_empty());
    }
}
