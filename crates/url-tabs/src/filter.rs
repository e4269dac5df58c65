//! Block render filters.
//!
//! The host rendering pipeline hands every block to a [`RenderPipeline`],
//! which runs an ordered list of [`BlockFilter`]s over the block's render
//! tree. A filter may patch the tree or drop the block entirely.

use tracing::debug;

use crate::block::ParsedBlock;
use crate::render::{HtmlRenderer, RenderElement};
use crate::request::RequestContext;
use crate::tab::{TabDescriptor, TabLink, TabUrlBuilder};
use crate::visibility::{VisibilityEvaluator, VisibilityRule};

/// Class added to the navigation item containing the active tab.
pub const CURRENT_CLASS: &str = "current-menu-item";

/// Class added to the active tab's link.
pub const ACTIVE_CLASS: &str = "is-active";

/// Class added to every tab link.
pub const TAB_LINK_CLASS: &str = "hm-url-tab-link";

/// Attribute marking conditionally visible blocks for client-side
/// transitions; its value is the endpoint name.
pub const TRANSITION_ATTRIBUTE: &str = "data-hm-tab-visibility";

/// Trait for block filters in the pipeline.
pub trait BlockFilter: Send + Sync {
    /// Filter name for debugging.
    fn name(&self) -> &str;

    /// Transform a block's render tree. Returning `None` removes the block
    /// from the output.
    fn transform_markup(
        &self,
        element: RenderElement,
        block: &ParsedBlock,
        ctx: &RequestContext,
    ) -> Option<RenderElement>;
}

/// Pipeline of block filters applied in sequence.
pub struct RenderPipeline {
    filters: Vec<Box<dyn BlockFilter>>,
    renderer: HtmlRenderer,
}

impl RenderPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            renderer: HtmlRenderer::new(),
        }
    }

    /// Tab link rewriting followed by visibility rules.
    pub fn with_defaults() -> Self {
        Self::new().add(TabLinkFilter).add(VisibilityFilter)
    }

    /// Add a filter to the end of the pipeline.
    pub fn add<F: BlockFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Filter names in execution order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Render one block.
    ///
    /// Inner blocks are rendered first and appended to the block's tree
    /// after its own children; then every filter runs in order, stopping as
    /// soon as one drops the block.
    pub fn render_block(&self, block: &ParsedBlock, ctx: &RequestContext) -> Option<RenderElement> {
        let mut element = block.element.clone();

        // Unweighted children render at weight 0.
        let first_weight = element
            .children
            .values()
            .map(|child| child.weight.unwrap_or(0))
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        for (index, inner) in block.inner_blocks.iter().enumerate() {
            if let Some(mut rendered) = self.render_block(inner, ctx) {
                let offset = i32::try_from(index).unwrap_or(i32::MAX);
                rendered.weight = Some(first_weight.saturating_add(offset));
                element.set_child(&format!("block-{index:04}"), rendered);
            }
        }

        self.filters.iter().try_fold(element, |element, filter| {
            let out = filter.transform_markup(element, block, ctx);
            if out.is_none() {
                debug!(filter = %filter.name(), block = %block.name(), "block removed");
            }
            out
        })
    }

    /// Render a list of top-level blocks to HTML.
    pub fn render_html(&self, blocks: &[ParsedBlock], ctx: &RequestContext) -> String {
        blocks
            .iter()
            .filter_map(|block| self.render_block(block, ctx))
            .map(|element| self.renderer.render(&element))
            .collect()
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Rewrites tab navigation links: sets the destination and marks the active
/// tab.
pub struct TabLinkFilter;

impl TabLinkFilter {
    fn patch(container: &mut RenderElement, link: &TabLink) {
        if link.is_active {
            container.add_class(CURRENT_CLASS);
        }

        match container.find_tag_mut("a") {
            Some(anchor) => {
                anchor.add_class(TAB_LINK_CLASS);
                if link.is_active {
                    anchor.add_class(ACTIVE_CLASS);
                }
                anchor.set_attribute("href", link.url.as_str());
            }
            None => debug!(url = %link.url, "tab link has no anchor element"),
        }
    }
}

impl BlockFilter for TabLinkFilter {
    fn name(&self) -> &str {
        "tab_link"
    }

    fn transform_markup(
        &self,
        mut element: RenderElement,
        block: &ParsedBlock,
        ctx: &RequestContext,
    ) -> Option<RenderElement> {
        if !block.is_navigation_link() {
            return Some(element);
        }
        let Some(tab) = TabDescriptor::from_attributes(&block.attrs) else {
            return Some(element);
        };

        let link = TabUrlBuilder::new(ctx).build(&tab);

        // The list item is the container; without one the root stands in.
        if element.find_tag("li").is_some() {
            if let Some(item) = element.find_tag_mut("li") {
                Self::patch(item, &link);
            }
        } else {
            Self::patch(&mut element, &link);
        }

        Some(element)
    }
}

/// Applies `hmUrlTabVisibility` rules to every block except navigation
/// links.
pub struct VisibilityFilter;

impl BlockFilter for VisibilityFilter {
    fn name(&self) -> &str {
        "tab_visibility"
    }

    fn transform_markup(
        &self,
        mut element: RenderElement,
        block: &ParsedBlock,
        ctx: &RequestContext,
    ) -> Option<RenderElement> {
        if block.is_navigation_link() {
            return Some(element);
        }
        let Some(rule) = VisibilityRule::from_attributes(&block.attrs) else {
            return Some(element);
        };

        let decision = VisibilityEvaluator::new(ctx).evaluate(&rule);
        if decision.hidden {
            return None;
        }

        if let Some(endpoint) = decision.transition_tag {
            match element.first_tagged_mut() {
                Some(root) => root.set_attribute(TRANSITION_ATTRIBUTE, endpoint),
                None => debug!(block = %block.name(), "no element to mark for transitions"),
            }
        }

        Some(element)
    }
}
