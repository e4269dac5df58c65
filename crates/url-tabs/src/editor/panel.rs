//! Tab visibility controls shown in the block inspector.

use serde::Serialize;

use super::VISIBILITY_INDICATOR_CLASS;
use super::tabs::{EditorBlock, TabSummary, collect_tabs};
use crate::visibility::{VisibilityCondition, VisibilityRule};

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Everything the inspector panel needs to render a block's visibility
/// controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityPanel {
    /// The block's current rule, defaults applied.
    pub rule: VisibilityRule,
    pub condition_options: Vec<SelectOption>,
    /// Distinct endpoints used by tabs on the page, in document order.
    pub endpoints: Vec<String>,
    pub show_endpoint_selector: bool,
    pub show_tab_selector: bool,
    /// Tabs of the selected endpoint, after a "Select a tab…" placeholder.
    pub tab_options: Vec<SelectOption>,
}

impl VisibilityPanel {
    /// Derive the panel for `block`.
    ///
    /// Returns `None` when the block is a navigation link, when the page has
    /// no tabs, or when an ancestor already carries a conditional rule.
    pub fn derive(
        block: &EditorBlock,
        ancestors: &[&EditorBlock],
        tabs: &[TabSummary],
    ) -> Option<Self> {
        if block.is_navigation_link() || tabs.is_empty() {
            return None;
        }
        if ancestors.iter().any(|ancestor| has_conditional_rule(ancestor)) {
            return None;
        }

        let rule = VisibilityRule::from_attributes(&block.attributes).unwrap_or_default();
        let specific = rule.condition == VisibilityCondition::SpecificTab;

        let mut endpoints: Vec<String> = Vec::new();
        for tab in tabs {
            if !endpoints.contains(&tab.endpoint) {
                endpoints.push(tab.endpoint.clone());
            }
        }

        let selected_endpoint = rule.effective_endpoint().to_string();
        let tab_options = std::iter::once(SelectOption::new("Select a tab…", ""))
            .chain(
                tabs.iter()
                    .filter(|tab| tab.endpoint == selected_endpoint)
                    .filter(|tab| !tab.is_home() && !tab.is_base())
                    .map(|tab| {
                        let label = if tab.label.is_empty() { &tab.url } else { &tab.label };
                        SelectOption::new(label.as_str(), tab.url.as_str())
                    }),
            )
            .collect();

        Some(Self {
            condition_options: condition_options(),
            show_endpoint_selector: specific && endpoints.len() > 1,
            show_tab_selector: specific,
            endpoints,
            tab_options,
            rule,
        })
    }
}

fn condition_options() -> Vec<SelectOption> {
    VisibilityCondition::ALL
        .iter()
        .map(|condition| {
            let label = match condition {
                VisibilityCondition::Always => "Always show",
                VisibilityCondition::NoEndpoint => "Show when no endpoint is active",
                VisibilityCondition::EndpointEmpty => "Show when endpoint has no value",
                VisibilityCondition::SpecificTab => "Show for specific tab",
            };
            SelectOption::new(label, condition.as_str())
        })
        .collect()
}

fn has_conditional_rule(block: &EditorBlock) -> bool {
    VisibilityRule::from_attributes(&block.attributes)
        .is_some_and(|rule| rule.condition != VisibilityCondition::Always)
}

/// Locate a block by client id together with its ancestors (outermost first).
fn find_with_ancestors<'a>(
    blocks: &'a [EditorBlock],
    client_id: &str,
    ancestors: &mut Vec<&'a EditorBlock>,
) -> Option<&'a EditorBlock> {
    for block in blocks {
        if block.client_id == client_id {
            return Some(block);
        }
        ancestors.push(block);
        if let Some(found) = find_with_ancestors(&block.inner_blocks, client_id, ancestors) {
            return Some(found);
        }
        ancestors.pop();
    }
    None
}

/// Visibility controls for the block with `client_id`.
pub fn visibility_panel(blocks: &[EditorBlock], client_id: &str) -> Option<VisibilityPanel> {
    let mut ancestors = Vec::new();
    let block = find_with_ancestors(blocks, client_id, &mut ancestors)?;
    VisibilityPanel::derive(block, &ancestors, &collect_tabs(blocks))
}

/// Class marking a block with a conditional rule, when the page has tabs.
pub fn visibility_indicator_class(blocks: &[EditorBlock], client_id: &str) -> Option<&'static str> {
    let mut ancestors = Vec::new();
    let block = find_with_ancestors(blocks, client_id, &mut ancestors)?;
    if block.is_navigation_link() || !has_conditional_rule(block) {
        return None;
    }
    if collect_tabs(blocks).is_empty() {
        return None;
    }
    Some(VISIBILITY_INDICATOR_CLASS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::block::NAVIGATION_LINK;

    fn nav(id: &str, kind: &str, endpoint: &str, url: &str, label: &str) -> EditorBlock {
        EditorBlock::new(
            id,
            NAVIGATION_LINK,
            json!({ "kind": kind, "tabEndpoint": endpoint, "url": url, "label": label }),
        )
    }

    fn with_rule(id: &str, name: &str, condition: &str, endpoint: &str, tab_url: &str) -> EditorBlock {
        EditorBlock::new(
            id,
            name,
            json!({ "hmUrlTabVisibility": { "condition": condition, "endpoint": endpoint, "tabUrl": tab_url } }),
        )
    }

    fn page(content: Vec<EditorBlock>) -> Vec<EditorBlock> {
        let mut blocks = vec![
            EditorBlock::new("nav", "core/navigation", json!({})).with_inner_blocks(vec![
                nav("home", "tab-home", "", "", "Overview"),
                nav("base", "tab-base", "tab", "", "All"),
                nav("specs", "tab", "tab", "specs", "Specs"),
                nav("unlabelled", "tab", "tab", "reviews", ""),
                nav("summary", "tab", "overview", "summary", "Summary"),
            ]),
        ];
        blocks.extend(content);
        blocks
    }

    #[test]
    fn panel_lists_conditions_and_tabs_for_endpoint() {
        let blocks = page(vec![with_rule("p", "core/paragraph", "specific-tab", "tab", "specs")]);
        let panel = visibility_panel(&blocks, "p").unwrap();

        let conditions: Vec<_> = panel.condition_options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(
            conditions,
            vec!["always", "no-endpoint", "endpoint-empty", "specific-tab"]
        );
        assert_eq!(panel.endpoints, vec!["tab", "overview"]);
        assert!(panel.show_endpoint_selector);
        assert!(panel.show_tab_selector);
        assert_eq!(
            panel.tab_options,
            vec![
                SelectOption::new("Select a tab…", ""),
                SelectOption::new("Specs", "specs"),
                SelectOption::new("reviews", "reviews"),
            ]
        );
    }

    #[test]
    fn panel_for_other_endpoint() {
        let blocks = page(vec![with_rule("p", "core/paragraph", "specific-tab", "overview", "")]);
        let panel = visibility_panel(&blocks, "p").unwrap();
        let values: Vec<_> = panel.tab_options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["", "summary"]);
    }

    #[test]
    fn selectors_hidden_for_non_specific_conditions() {
        let blocks = page(vec![EditorBlock::new("p", "core/paragraph", json!({}))]);
        let panel = visibility_panel(&blocks, "p").unwrap();
        assert_eq!(panel.rule, VisibilityRule::default());
        assert!(!panel.show_endpoint_selector);
        assert!(!panel.show_tab_selector);
    }

    #[test]
    fn no_panel_without_tabs_or_for_navigation_links() {
        let plain = vec![EditorBlock::new("p", "core/paragraph", json!({}))];
        assert!(visibility_panel(&plain, "p").is_none());

        let blocks = page(Vec::new());
        assert!(visibility_panel(&blocks, "specs").is_none());
        assert!(visibility_panel(&blocks, "missing").is_none());
    }

    #[test]
    fn no_panel_inside_conditional_parent() {
        let group = with_rule("g", "core/group", "no-endpoint", "tab", "")
            .with_inner_blocks(vec![EditorBlock::new("child", "core/paragraph", Value::Null)]);
        let blocks = page(vec![group]);
        assert!(visibility_panel(&blocks, "g").is_some());
        assert!(visibility_panel(&blocks, "child").is_none());
    }

    #[test]
    fn panel_allowed_inside_always_parent() {
        let group = with_rule("g", "core/group", "always", "tab", "")
            .with_inner_blocks(vec![EditorBlock::new("child", "core/paragraph", json!({}))]);
        let blocks = page(vec![group]);
        assert!(visibility_panel(&blocks, "child").is_some());
    }

    #[test]
    fn indicator_requires_conditional_rule_and_tabs() {
        let blocks = page(vec![
            with_rule("shown", "core/paragraph", "endpoint-empty", "tab", ""),
            with_rule("plain", "core/paragraph", "always", "tab", ""),
        ]);
        assert_eq!(
            visibility_indicator_class(&blocks, "shown"),
            Some("wp-block-has-hm-tab-visibility")
        );
        assert_eq!(visibility_indicator_class(&blocks, "plain"), None);

        let no_tabs = vec![with_rule("shown", "core/paragraph", "endpoint-empty", "tab", "")];
        assert_eq!(visibility_indicator_class(&no_tabs, "shown"), None);
    }
}
