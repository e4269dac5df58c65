//! Structured render tree.
//!
//! Block markup is handled as a tree of [`RenderElement`]s rather than as an
//! HTML string. Filters patch classes and attributes directly on the tree,
//! and [`HtmlRenderer`] serializes it once at the output boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Elements that have no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A render element in the JSON render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderElement {
    #[serde(rename = "#type")]
    pub element_type: String,
    #[serde(rename = "#weight", skip_serializing_if = "Option::is_none", default)]
    pub weight: Option<i32>,
    #[serde(rename = "#tag", skip_serializing_if = "Option::is_none", default)]
    pub tag: Option<String>,
    #[serde(rename = "#value", skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(rename = "#format", skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    #[serde(rename = "#attributes", skip_serializing_if = "Map::is_empty", default)]
    pub attributes: Map<String, Value>,
    #[serde(flatten)]
    pub children: BTreeMap<String, RenderElement>,
}

impl RenderElement {
    pub fn set_child(&mut self, key: &str, element: RenderElement) {
        self.children.insert(key.into(), element);
    }

    /// Children in render order: by weight (unweighted counts as 0), then
    /// by key.
    pub fn ordered_children(&self) -> Vec<&RenderElement> {
        let mut children: Vec<_> = self.children.iter().collect();
        children.sort_by(|(key_a, a), (key_b, b)| {
            a.weight
                .unwrap_or(0)
                .cmp(&b.weight.unwrap_or(0))
                .then_with(|| key_a.cmp(key_b))
        });
        children.into_iter().map(|(_, child)| child).collect()
    }

    /// Whether this element's tag is `tag` (case-insensitive).
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// First element with the given tag, searching this element and then its
    /// descendants in render order.
    pub fn find_tag(&self, tag: &str) -> Option<&RenderElement> {
        if self.is_tag(tag) {
            return Some(self);
        }
        self.ordered_children()
            .into_iter()
            .find_map(|child| child.find_tag(tag))
    }

    /// Mutable variant of [`Self::find_tag`].
    pub fn find_tag_mut(&mut self, tag: &str) -> Option<&mut RenderElement> {
        self.find_first_mut(&|el: &RenderElement| el.is_tag(tag))
    }

    /// First tagged element: this one, or its first tagged descendant.
    pub fn first_tagged_mut(&mut self) -> Option<&mut RenderElement> {
        self.find_first_mut(&|el: &RenderElement| el.tag.is_some())
    }

    /// First element matching `pred`, pre-order, children in render order.
    pub fn find_first_mut(
        &mut self,
        pred: &dyn Fn(&RenderElement) -> bool,
    ) -> Option<&mut RenderElement> {
        if pred(self) {
            return Some(self);
        }
        let mut children: Vec<_> = self.children.values_mut().collect();
        children.sort_by_key(|child| child.weight.unwrap_or(0));
        children
            .into_iter()
            .find_map(|child| child.find_first_mut(pred))
    }

    /// Class list, accepting either an array or a space-separated string.
    pub fn classes(&self) -> Vec<String> {
        match self.attributes.get("class") {
            Some(Value::Array(arr)) => arr
                .iter()
                .filter_map(Value::as_str)
                .flat_map(str::split_whitespace)
                .map(String::from)
                .collect(),
            Some(Value::String(s)) => s.split_whitespace().map(String::from).collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// Add a class if it is not already present.
    pub fn add_class(&mut self, class: &str) {
        let mut classes = self.classes();
        if classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        self.attributes.insert(
            "class".into(),
            Value::Array(classes.into_iter().map(Value::String).collect()),
        );
    }

    /// String value of an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.into(), Value::String(value.into()));
    }
}

/// Builder for constructing render elements.
pub struct ElementBuilder {
    element_type: String,
    weight: Option<i32>,
    tag: Option<String>,
    value: Option<String>,
    format: Option<String>,
    classes: Vec<String>,
    attrs: Map<String, Value>,
    children: BTreeMap<String, RenderElement>,
}

impl ElementBuilder {
    fn new(element_type: &str) -> Self {
        Self {
            element_type: element_type.into(),
            weight: None,
            tag: None,
            value: None,
            format: None,
            classes: Vec::new(),
            attrs: Map::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn weight(mut self, w: i32) -> Self {
        self.weight = Some(w);
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn child(mut self, key: &str, element: RenderElement) -> Self {
        self.children.insert(key.into(), element);
        self
    }

    pub fn build(self) -> RenderElement {
        let mut attributes = self.attrs;
        if !self.classes.is_empty() {
            attributes.insert(
                "class".into(),
                Value::Array(self.classes.into_iter().map(Value::String).collect()),
            );
        }

        RenderElement {
            element_type: self.element_type,
            weight: self.weight,
            tag: self.tag,
            value: self.value,
            format: self.format,
            attributes,
            children: self.children,
        }
    }
}

/// Create a tagged element that wraps children.
pub fn element(tag: &str) -> ElementBuilder {
    let mut b = ElementBuilder::new("element");
    b.tag = Some(tag.into());
    b
}

/// Create a container element (groups children without a wrapping tag).
pub fn container() -> ElementBuilder {
    ElementBuilder::new("container")
}

/// Create a markup element with an HTML tag and text value.
pub fn markup(tag: &str, value: &str) -> ElementBuilder {
    let mut b = ElementBuilder::new("markup");
    b.tag = Some(tag.into());
    b.value = Some(value.into());
    b
}

/// Escape text for use in HTML content or a quoted attribute value.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Serializes a render tree to HTML.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    _private: (),
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Render an element and its children.
    pub fn render(&self, element: &RenderElement) -> String {
        let mut html = String::new();
        self.render_into(element, &mut html);
        html
    }

    fn render_into(&self, element: &RenderElement, html: &mut String) {
        let tag = element.tag.as_deref().or(match element.element_type.as_str() {
            "markup" => Some("span"),
            _ => None,
        });

        let Some(tag) = tag else {
            // Untagged containers render only their contents.
            self.render_contents(element, html);
            return;
        };

        html.push('<');
        html.push_str(tag);
        html.push_str(&self.render_attributes(element));

        if VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) {
            html.push_str(" />");
            return;
        }

        html.push('>');
        self.render_contents(element, html);
        html.push_str("</");
        html.push_str(tag);
        html.push('>');
    }

    fn render_contents(&self, element: &RenderElement, html: &mut String) {
        if let Some(value) = &element.value {
            html.push_str(&self.process_value(value, element.format.as_deref()));
        }
        for child in element.ordered_children() {
            self.render_into(child, html);
        }
    }

    /// Plain text is escaped; `full_html` passes through unchanged.
    fn process_value(&self, value: &str, format: Option<&str>) -> String {
        match format {
            Some("full_html") => value.to_string(),
            _ => html_escape(value),
        }
    }

    fn render_attributes(&self, element: &RenderElement) -> String {
        let mut out = String::new();

        let classes = element.classes();
        if !classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", html_escape(&classes.join(" "))));
        }

        for (key, value) in &element.attributes {
            if key == "class" || !is_valid_attribute_name(key) {
                continue;
            }
            match value {
                Value::Null | Value::Bool(false) => {}
                Value::Bool(true) => out.push_str(&format!(" {key}")),
                Value::String(s) => out.push_str(&format!(" {key}=\"{}\"", html_escape(s))),
                other => out.push_str(&format!(" {key}=\"{}\"", html_escape(&other.to_string()))),
            }
        }

        out
    }
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn nav_item() -> RenderElement {
        element("li")
            .class("wp-block-navigation-item")
            .child(
                "link",
                element("a")
                    .class("wp-block-navigation-item__content")
                    .attr("href", "#")
                    .child(
                        "label",
                        markup("span", "Shoes")
                            .class("wp-block-navigation-item__label")
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    #[test]
    fn renders_nested_elements() {
        let html = HtmlRenderer::new().render(&nav_item());
        assert_eq!(
            html,
            "<li class=\"wp-block-navigation-item\"><a class=\"wp-block-navigation-item__content\" href=\"#\"><span class=\"wp-block-navigation-item__label\">Shoes</span></a></li>"
        );
    }

    #[test]
    fn escapes_values_and_attributes() {
        let el = markup("p", "<b>&</b>").attr("title", "\"quoted\"").build();
        assert_eq!(
            HtmlRenderer::new().render(&el),
            "<p title=\"&quot;quoted&quot;\">&lt;b&gt;&amp;&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn full_html_passes_through() {
        let mut el = markup("div", "<em>hi</em>").build();
        el.format = Some("full_html".into());
        assert_eq!(HtmlRenderer::new().render(&el), "<div><em>hi</em></div>");
    }

    #[test]
    fn void_elements_self_close() {
        let el = element("img").attr("src", "/a.png").build();
        assert_eq!(HtmlRenderer::new().render(&el), "<img src=\"/a.png\" />");
    }

    #[test]
    fn container_renders_children_in_weight_order() {
        let el = container()
            .child("a", markup("p", "second").weight(2).build())
            .child("b", markup("p", "first").weight(1).build())
            .build();
        assert_eq!(HtmlRenderer::new().render(&el), "<p>first</p><p>second</p>");
    }

    #[test]
    fn equal_weights_render_in_key_order() {
        let el = container()
            .child("b", markup("p", "b-weighted").weight(0).build())
            .child("c", markup("p", "c-early").weight(-1).build())
            .child("a", markup("p", "a-unweighted").build())
            .build();
        assert_eq!(
            HtmlRenderer::new().render(&el),
            "<p>c-early</p><p>a-unweighted</p><p>b-weighted</p>"
        );
    }

    #[test]
    fn boolean_and_invalid_attributes() {
        let mut el = element("details").build();
        el.attributes.insert("open".into(), json!(true));
        el.attributes.insert("hidden".into(), json!(false));
        el.attributes.insert("bad name".into(), json!("x"));
        assert_eq!(HtmlRenderer::new().render(&el), "<details open></details>");
    }

    #[test]
    fn find_tag_searches_depth_first() {
        let mut item = nav_item();
        assert!(item.find_tag("li").is_some());
        assert_eq!(item.find_tag("a").unwrap().attribute("href"), Some("#"));
        assert!(item.find_tag("ul").is_none());

        item.find_tag_mut("a").unwrap().set_attribute("href", "/x/");
        assert_eq!(item.find_tag("a").unwrap().attribute("href"), Some("/x/"));
    }

    #[test]
    fn add_class_is_idempotent_and_accepts_string_classes() {
        let mut el = element("li").build();
        el.attributes.insert("class".into(), json!("one two"));
        el.add_class("three");
        el.add_class("one");
        assert_eq!(el.classes(), vec!["one", "two", "three"]);
        assert!(el.has_class("three"));
    }

    #[test]
    fn deserializes_render_tree_json() {
        let el: RenderElement = serde_json::from_value(json!({
            "#type": "element",
            "#tag": "div",
            "#attributes": { "class": ["wp-block-group"] },
            "inner": { "#type": "markup", "#tag": "p", "#value": "Hello" }
        }))
        .unwrap();
        assert!(el.has_class("wp-block-group"));
        assert_eq!(
            HtmlRenderer::new().render(&el),
            "<div class=\"wp-block-group\"><p>Hello</p></div>"
        );
    }
}
