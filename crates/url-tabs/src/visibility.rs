//! Tab-dependent block visibility.
//!
//! Any block can carry a visibility rule that shows it only for a given
//! endpoint state. Unknown conditions fail open: the block is shown.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::endpoint::{DEFAULT_ENDPOINT, effective_endpoint_name};
use crate::request::RequestContext;
use crate::resolver::EndpointResolver;
use crate::slug::slugs_match;

/// Block attribute holding the visibility rule.
pub const VISIBILITY_ATTRIBUTE: &str = "hmUrlTabVisibility";

/// When a block should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisibilityCondition {
    /// Always shown.
    #[default]
    Always,
    /// Shown only when no registered endpoint is active.
    NoEndpoint,
    /// Shown only when the endpoint is present without a value.
    EndpointEmpty,
    /// Shown only when the endpoint value matches the target slug.
    SpecificTab,
}

impl VisibilityCondition {
    pub const ALL: [VisibilityCondition; 4] = [
        VisibilityCondition::Always,
        VisibilityCondition::NoEndpoint,
        VisibilityCondition::EndpointEmpty,
        VisibilityCondition::SpecificTab,
    ];

    /// Parse a condition; unrecognized values map to [`Self::Always`].
    pub fn parse(condition: &str) -> Self {
        match condition {
            "no-endpoint" => Self::NoEndpoint,
            "endpoint-empty" => Self::EndpointEmpty,
            "specific-tab" => Self::SpecificTab,
            _ => Self::Always,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::NoEndpoint => "no-endpoint",
            Self::EndpointEmpty => "endpoint-empty",
            Self::SpecificTab => "specific-tab",
        }
    }
}

impl From<String> for VisibilityCondition {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<VisibilityCondition> for String {
    fn from(c: VisibilityCondition) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for VisibilityCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block's visibility rule (the `hmUrlTabVisibility` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisibilityRule {
    pub condition: VisibilityCondition,
    #[serde(rename = "endpoint")]
    pub endpoint_name: String,
    #[serde(rename = "tabUrl")]
    pub target_slug: String,
}

impl Default for VisibilityRule {
    fn default() -> Self {
        Self {
            condition: VisibilityCondition::Always,
            endpoint_name: DEFAULT_ENDPOINT.to_string(),
            target_slug: String::new(),
        }
    }
}

impl VisibilityRule {
    pub fn new(
        condition: VisibilityCondition,
        endpoint_name: impl Into<String>,
        target_slug: impl Into<String>,
    ) -> Self {
        Self {
            condition,
            endpoint_name: endpoint_name.into(),
            target_slug: target_slug.into(),
        }
    }

    /// Read the rule from a block's attributes.
    ///
    /// Returns `None` when the block has no rule. Individual fields that are
    /// missing or of the wrong type take their defaults.
    pub fn from_attributes(attrs: &Value) -> Option<Self> {
        let raw = attrs.get(VISIBILITY_ATTRIBUTE)?;
        let obj = raw.as_object()?;
        if obj.is_empty() {
            return None;
        }

        let text = |key: &str| obj.get(key).and_then(Value::as_str);
        Some(Self {
            condition: text("condition")
                .map(VisibilityCondition::parse)
                .unwrap_or_default(),
            endpoint_name: text("endpoint").unwrap_or(DEFAULT_ENDPOINT).to_string(),
            target_slug: text("tabUrl").unwrap_or("").to_string(),
        })
    }

    /// Endpoint name with the `tab` default applied.
    pub fn effective_endpoint(&self) -> &str {
        effective_endpoint_name(&self.endpoint_name)
    }
}

/// Outcome of evaluating a visibility rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibilityDecision {
    pub hidden: bool,
    /// Endpoint name to mark the block with for client-side transitions;
    /// `None` for `always` rules.
    pub transition_tag: Option<String>,
}

/// Evaluates visibility rules against one request.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityEvaluator<'a> {
    resolver: EndpointResolver<'a>,
}

impl<'a> VisibilityEvaluator<'a> {
    pub fn new(ctx: &'a RequestContext) -> Self {
        Self {
            resolver: EndpointResolver::new(ctx),
        }
    }

    pub fn evaluate(&self, rule: &VisibilityRule) -> VisibilityDecision {
        let endpoint = rule.effective_endpoint();

        let hidden = match rule.condition {
            VisibilityCondition::Always => false,
            VisibilityCondition::EndpointEmpty => {
                self.resolver.resolve(endpoint).as_deref() != Some("")
            }
            // Any active endpoint counts, not only the one on the rule.
            VisibilityCondition::NoEndpoint => self.resolver.any_active(),
            // An absent endpoint compares as the empty slug.
            VisibilityCondition::SpecificTab => {
                let value = self.resolver.resolve(endpoint).unwrap_or_default();
                !slugs_match(&value, &rule.target_slug)
            }
        };

        let transition_tag = match rule.condition {
            VisibilityCondition::Always => None,
            _ => Some(endpoint.to_string()),
        };

        debug!(
            condition = %rule.condition,
            endpoint = %endpoint,
            hidden,
            "visibility evaluated"
        );

        VisibilityDecision {
            hidden,
            transition_tag,
        }
    }
}
