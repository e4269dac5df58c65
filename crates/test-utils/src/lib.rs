//! URL tabs test utilities.
//!
//! Helpers for integration testing: block fixtures in the JSON shapes the
//! host hands over (parsed blocks with render trees, editor blocks) and
//! assertion utilities for rendered output.

use serde_json::{Value as JsonValue, json};

/// Block name of navigation links.
pub const NAVIGATION_LINK: &str = "core/navigation-link";

/// Create a tab navigation link.
pub fn tab_link(kind: &str, endpoint: &str, url: &str) -> TestNavLink {
    TestNavLink {
        client_id: format!("nav-{kind}-{endpoint}-{url}"),
        attrs: json!({ "kind": kind, "tabEndpoint": endpoint, "url": url }),
        label: url.to_string(),
        href: "#".to_string(),
    }
}

/// Create a plain (non-tab) navigation link.
pub fn plain_link(url: &str, label: &str) -> TestNavLink {
    TestNavLink {
        client_id: format!("nav-{url}"),
        attrs: json!({ "url": url, "label": label }),
        label: label.to_string(),
        href: url.to_string(),
    }
}

/// A navigation link builder.
#[derive(Debug, Clone)]
pub struct TestNavLink {
    pub client_id: String,
    pub attrs: JsonValue,
    pub label: String,
    pub href: String,
}

impl TestNavLink {
    /// Set the label shown in markup and stored in attributes.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        if let Some(obj) = self.attrs.as_object_mut() {
            obj.insert("label".into(), json!(label));
        }
        self
    }

    /// Set the editor client id.
    pub fn with_id(mut self, client_id: &str) -> Self {
        self.client_id = client_id.to_string();
        self
    }

    /// Add a raw attribute.
    pub fn with_attr(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.attrs.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Render tree of a navigation item: `li > a > span`.
    pub fn element(&self) -> JsonValue {
        json!({
            "#type": "element",
            "#tag": "li",
            "#attributes": { "class": ["wp-block-navigation-item"] },
            "link": {
                "#type": "element",
                "#tag": "a",
                "#attributes": {
                    "class": ["wp-block-navigation-item__content"],
                    "href": self.href,
                },
                "label": {
                    "#type": "markup",
                    "#tag": "span",
                    "#value": self.label,
                },
            },
        })
    }

    /// The link as a parsed block.
    pub fn parsed(&self) -> JsonValue {
        json!({
            "blockName": NAVIGATION_LINK,
            "attrs": self.attrs,
            "element": self.element(),
            "innerBlocks": [],
        })
    }

    /// The link as an editor block.
    pub fn editor(&self) -> JsonValue {
        json!({
            "clientId": self.client_id,
            "name": NAVIGATION_LINK,
            "attributes": self.attrs,
            "innerBlocks": [],
        })
    }
}

/// Create a content block rendering as `<tag>text</tag>`.
pub fn content_block(name: &str, tag: &str, text: &str) -> TestBlock {
    TestBlock {
        client_id: name.replace('/', "-"),
        name: name.to_string(),
        attrs: json!({}),
        tag: tag.to_string(),
        text: text.to_string(),
        inner: Vec::new(),
    }
}

/// Create a paragraph block.
pub fn paragraph(text: &str) -> TestBlock {
    content_block("core/paragraph", "p", text)
}

/// Create a group block wrapping `inner`.
pub fn group(inner: Vec<TestBlock>) -> TestBlock {
    let mut block = content_block("core/group", "div", "");
    block.inner = inner;
    block
}

/// A content block builder.
#[derive(Debug, Clone)]
pub struct TestBlock {
    pub client_id: String,
    pub name: String,
    pub attrs: JsonValue,
    pub tag: String,
    pub text: String,
    pub inner: Vec<TestBlock>,
}

impl TestBlock {
    /// Set the editor client id.
    pub fn with_id(mut self, client_id: &str) -> Self {
        self.client_id = client_id.to_string();
        self
    }

    /// Attach a visibility rule.
    pub fn with_visibility(mut self, condition: &str, endpoint: &str, tab_url: &str) -> Self {
        if let Some(obj) = self.attrs.as_object_mut() {
            obj.insert(
                "hmUrlTabVisibility".into(),
                json!({ "condition": condition, "endpoint": endpoint, "tabUrl": tab_url }),
            );
        }
        self
    }

    /// Add a raw attribute.
    pub fn with_attr(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.attrs.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Render tree of the block itself, without inner blocks.
    pub fn element(&self) -> JsonValue {
        if self.text.is_empty() {
            json!({ "#type": "element", "#tag": self.tag })
        } else {
            json!({ "#type": "markup", "#tag": self.tag, "#value": self.text })
        }
    }

    /// The block as a parsed block.
    pub fn parsed(&self) -> JsonValue {
        let inner: Vec<JsonValue> = self.inner.iter().map(TestBlock::parsed).collect();
        json!({
            "blockName": self.name,
            "attrs": self.attrs,
            "element": self.element(),
            "innerBlocks": inner,
        })
    }

    /// The block as an editor block.
    pub fn editor(&self) -> JsonValue {
        let inner: Vec<JsonValue> = self.inner.iter().map(TestBlock::editor).collect();
        json!({
            "clientId": self.client_id,
            "name": self.name,
            "attributes": self.attrs,
            "innerBlocks": inner,
        })
    }
}

/// Parsed navigation block containing `links`.
pub fn navigation(links: &[TestNavLink]) -> JsonValue {
    let inner: Vec<JsonValue> = links.iter().map(TestNavLink::parsed).collect();
    json!({
        "blockName": "core/navigation",
        "attrs": {},
        "element": {
            "#type": "element",
            "#tag": "ul",
            "#attributes": { "class": ["wp-block-navigation__container"] },
        },
        "innerBlocks": inner,
    })
}

/// Editor navigation block containing `links`.
pub fn editor_navigation(links: &[TestNavLink]) -> JsonValue {
    let inner: Vec<JsonValue> = links.iter().map(TestNavLink::editor).collect();
    json!({
        "clientId": "navigation",
        "name": "core/navigation",
        "attributes": {},
        "innerBlocks": inner,
    })
}

/// The standard product page tabs: home, base, and two valued tabs.
pub fn product_tabs() -> Vec<TestNavLink> {
    vec![
        tab_link("tab-home", "", "").with_label("Overview"),
        tab_link("tab-base", "tab", "").with_label("All"),
        tab_link("tab", "tab", "Specs").with_label("Specs"),
        tab_link("tab", "tab", "reviews"),
    ]
}

/// Endpoint list in snapshot form, e.g. `endpoints(&[("tab", 8191)])`.
pub fn endpoints(list: &[(&str, u32)]) -> JsonValue {
    JsonValue::Array(
        list.iter()
            .map(|(name, mask)| json!({ "name": name, "mask": mask }))
            .collect(),
    )
}

/// Assertion helpers for rendered output.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `needle` occurs exactly `count` times.
    pub fn occurs(haystack: &str, needle: &str, count: usize) {
        let actual = haystack.matches(needle).count();
        assert_eq!(
            actual, count,
            "Expected '{needle}' {count} time(s), found {actual}\nActual: {haystack}"
        );
    }
}
