//! URL tabs
//!
//! Tab navigation driven by rewrite endpoints. A page at `/products/` can be
//! split into tabs at `/products/tab/specs/`, `/products/tab/reviews/` and
//! so on, without separate posts. This crate resolves endpoint values from a
//! request, builds tab link URLs, marks the active tab, and decides which
//! blocks are shown for the current tab.
//!
//! # Crate Structure
//!
//! - [`endpoint`] - Rewrite endpoints and the registry
//! - [`request`] - Per-request path and query context
//! - [`resolver`] - Endpoint value resolution
//! - [`tab`] - Tab URL building and active state
//! - [`visibility`] - Tab-dependent block visibility
//! - [`render`] - Render element trees and HTML output
//! - [`filter`] - Block render filters
//! - [`editor`] - Editor snapshot, tab discovery and visibility controls
//!
//! # Example
//!
//! ```
//! use url_tabs::prelude::*;
//!
//! let ctx = RequestContext::new("/products/tab/specs/", EndpointRegistry::default());
//! assert_eq!(EndpointResolver::new(&ctx).resolve("tab").as_deref(), Some("specs"));
//!
//! let link = TabUrlBuilder::new(&ctx).build(&TabDescriptor::new(TabKind::Tab, "tab", "Specs"));
//! assert_eq!(link.url, "/products/tab/specs/");
//! assert!(link.is_active);
//! ```

pub mod block;
pub mod config;
pub mod editor;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod render;
pub mod request;
pub mod resolver;
pub mod slug;
pub mod tab;
pub mod visibility;

pub use error::{Error, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::block::ParsedBlock;
    pub use crate::endpoint::{Endpoint, EndpointMask, EndpointRegistry};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{BlockFilter, RenderPipeline};
    pub use crate::render::{HtmlRenderer, RenderElement};
    pub use crate::request::RequestContext;
    pub use crate::resolver::EndpointResolver;
    pub use crate::slug::normalize_slug;
    pub use crate::tab::{TabDescriptor, TabKind, TabLink, TabUrlBuilder};
    pub use crate::visibility::{
        VisibilityCondition, VisibilityDecision, VisibilityEvaluator, VisibilityRule,
    };
}
