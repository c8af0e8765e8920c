//! The rule contract: what a rule is and what it produces.
//!
//! A rule is behavior plus metadata - a check function, a selector that
//! restricts which nodes it sees, and reporting fields. There is no trait
//! hierarchy; the contract is a flat record holding a boxed closure, so rule
//! catalogues can be assembled at runtime from any source.
//!
//! Check functions are pure: they must not mutate the node, its ancestors, or
//! the context. They may read the whole forest through [`Context::ast`] for
//! cross-reference checks (e.g. "every `ip access-group` names a defined
//! access-list").

use crate::tree::{ConfigNode, Loc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity carried by rules and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Violations that must be fixed; also used for contained rule failures.
    #[default]
    Error,
    /// Violations worth flagging that do not block.
    Warning,
    /// Advisory findings.
    Info,
}

impl Level {
    /// Human-readable label, matching the wire tag.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Reporting metadata attached to a rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMetadata {
    /// Severity applied to this rule's results.
    pub level: Level,
    /// Owning business unit, for report routing.
    pub obu: String,
    /// Contact for the rule (team or person).
    pub owner: String,
    /// Suggested fix, copied onto failing results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

/// Signature of a rule's check function.
///
/// Invoked once per selected node; returns a result for every invocation,
/// passes included, so reports can show positive evidence.
pub type CheckFn = Box<dyn Fn(&ConfigNode, &Context<'_>) -> RuleResult + Send + Sync>;

/// A single validation rule.
pub struct Rule {
    /// Non-empty identifier, unique within a rule set. The engine does not
    /// enforce uniqueness; duplicate ids both run, in order.
    pub id: String,
    /// Optional node selector; see [`crate::selector::selector_matches`].
    /// `None` selects every node.
    pub selector: Option<String>,
    /// Reporting metadata.
    pub metadata: RuleMetadata,
    /// The check function.
    pub check: CheckFn,
}

impl Rule {
    /// Build a rule from its parts.
    pub fn new<F>(
        id: impl Into<String>,
        selector: Option<&str>,
        metadata: RuleMetadata,
        check: F,
    ) -> Self
    where
        F: Fn(&ConfigNode, &Context<'_>) -> RuleResult + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            selector: selector.map(String::from),
            metadata,
            check: Box::new(check),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("selector", &self.selector)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Outcome of one rule invocation on one node.
///
/// Carries node identity and location by value so it outlives the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub passed: bool,
    pub message: String,
    pub rule_id: String,
    pub node_id: String,
    pub level: Level,
    pub loc: Loc,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl RuleResult {
    /// A passing result for `rule` on `node`.
    #[must_use]
    pub fn passing(rule: &Rule, node: &ConfigNode, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            rule_id: rule.id.clone(),
            node_id: node.id.clone(),
            level: rule.metadata.level,
            loc: node.loc,
            remediation: None,
        }
    }

    /// A failing result for `rule` on `node`, carrying the rule's level and
    /// remediation.
    #[must_use]
    pub fn failing(rule: &Rule, node: &ConfigNode, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            rule_id: rule.id.clone(),
            node_id: node.id.clone(),
            level: rule.metadata.level,
            loc: node.loc,
            remediation: rule.metadata.remediation.clone(),
        }
    }

    /// A passing result built from a rule id.
    ///
    /// Check functions cannot see the `Rule` record they belong to, so this
    /// variant takes the id directly. Passes report at `info`.
    #[must_use]
    pub fn passing_with(rule_id: impl Into<String>, node: &ConfigNode, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            rule_id: rule_id.into(),
            node_id: node.id.clone(),
            level: Level::Info,
            loc: node.loc,
            remediation: None,
        }
    }

    /// A failing result built from a rule id and an explicit level.
    #[must_use]
    pub fn failing_with(
        rule_id: impl Into<String>,
        node: &ConfigNode,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        Self {
            passed: false,
            message: message.into(),
            rule_id: rule_id.into(),
            node_id: node.id.clone(),
            level,
            loc: node.loc,
            remediation: None,
        }
    }

    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub const fn is_fail(&self) -> bool {
        !self.passed
    }
}

/// Partial context supplied by the embedder to [`crate::engine::run`].
///
/// Currently carries nothing; it exists so embedder-provided context can grow
/// without changing the engine contract. The engine completes it into a
/// [`Context`] by attaching the forest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSeed;

/// Read-only handle passed to every check function.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The whole forest under scan, for cross-reference rules.
    pub ast: &'a [ConfigNode],
}

impl<'a> Context<'a> {
    /// Complete a seed into a full context by attaching the forest.
    #[must_use]
    pub fn new(_seed: ContextSeed, ast: &'a [ConfigNode]) -> Self {
        Self { ast }
    }
}
