//! Rule engine: walk the forest, apply matching rules, contain failures.
//!
//! The engine is a single pre-order pass. For every node, every rule whose
//! selector matches is invoked; result order is therefore the flattened
//! pre-order walk of the forest, and within one node the order of the rule
//! slice. Every invocation produces a result, passes included.
//!
//! # Failure barrier
//!
//! A rule's check function runs inside `catch_unwind`. A panicking rule
//! yields one failing result (level `error`, rule and node identity
//! preserved) and the scan continues with the next rule; a misbehaving rule
//! can never abort a scan. Panics from the engine's own traversal (e.g.
//! allocator exhaustion) propagate to the caller unchanged.

use crate::rule::{Context, ContextSeed, Level, Rule, RuleResult};
use crate::selector::selector_matches;
use crate::tree::{ConfigNode, preorder};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::warn;

/// Run every matching rule over every node of the forest.
///
/// Pure: no I/O, no mutation of the forest or rules. Duplicate rule ids are
/// not an error; both run, in order.
#[must_use]
pub fn run(forest: &[ConfigNode], rules: &[Rule], seed: ContextSeed) -> Vec<RuleResult> {
    if forest.is_empty() || rules.is_empty() {
        return Vec::new();
    }

    let ctx = Context::new(seed, forest);
    let mut results = Vec::new();
    for node in preorder(forest) {
        for rule in rules {
            if !selector_matches(&node.id, rule.selector.as_deref()) {
                continue;
            }
            results.push(run_check(rule, node, &ctx));
        }
    }
    results
}

/// Invoke one check inside the failure barrier.
fn run_check(rule: &Rule, node: &ConfigNode, ctx: &Context<'_>) -> RuleResult {
    match catch_unwind(AssertUnwindSafe(|| (rule.check)(node, ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_payload_to_string(payload.as_ref());
            warn!(rule = %rule.id, node = %node.id, "rule check panicked: {reason}");
            RuleResult {
                passed: false,
                message: format!("rule check panicked: {reason}"),
                rule_id: rule.id.clone(),
                node_id: node.id.clone(),
                level: Level::Error,
                loc: node.loc,
                remediation: None,
            }
        }
    }
}

fn panic_payload_to_string(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
