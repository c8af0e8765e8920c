#![cfg_attr(not(test), forbid(unsafe_code))]
//! netcfg-lint core library.
//!
//! This library validates hierarchical text-based device configurations
//! (Cisco IOS and similar vendor dialects) against a library of business and
//! security rules. It is the shared core of a batch CLI and an interactive
//! editor integration; both consume the same two pure entry points.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Configuration text                      │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Permissive Parser                       │
//! │  sanitize → block-starter schema → parent stack →            │
//! │  end-line fix-up → virtual-root wrapper                      │
//! └──────────────────────────────────────────────────────────────┘
//!                               │ forest of ConfigNodes
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Rule Engine                           │
//! │  pre-order walk → selector match → check fn                  │
//! │  (inside a per-rule panic barrier)                           │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!                     sequence of RuleResults
//! ```
//!
//! # Usage
//!
//! ```
//! use netcfg_lint::{ContextSeed, Level, ParseOptions, Rule, RuleMetadata, RuleResult};
//!
//! let forest = netcfg_lint::parse(
//!     "interface Gi0/1\n description uplink\n no shutdown",
//!     &ParseOptions::default(),
//! );
//!
//! let rule = Rule::new(
//!     "iface-description",
//!     Some("interface"),
//!     RuleMetadata { level: Level::Warning, ..RuleMetadata::default() },
//!     |node, _ctx| {
//!         if node.children.iter().any(|c| c.head() == Some("description")) {
//!             RuleResult::passing_with("iface-description", node, "description present")
//!         } else {
//!             RuleResult::failing_with(
//!                 "iface-description",
//!                 node,
//!                 Level::Warning,
//!                 "description missing",
//!             )
//!         }
//!     },
//! );
//!
//! let results = netcfg_lint::run(&forest, &[rule], ContextSeed);
//! assert!(results.iter().all(RuleResult::is_pass));
//! ```
//!
//! The core performs no I/O, reads no environment, and holds no process-wide
//! mutable state; a scan is a pure function from `(text, rules)` to results.
//! Separate scans may run concurrently over a shared immutable rule slice.

pub mod engine;
pub mod parser;
pub mod regex_engine;
pub mod rule;
pub mod sanitize;
pub mod schema;
pub mod selector;
pub mod tree;

// Re-export the public contract at the crate root.
pub use engine::run;
pub use parser::{ParseOptions, ParseStats, parse, parse_with_schema, parse_with_stats};
pub use regex_engine::{CompiledRegex, LazyCompiledRegex, needs_backtracking_engine};
pub use rule::{CheckFn, Context, ContextSeed, Level, Rule, RuleMetadata, RuleResult};
pub use sanitize::{measure_indent, sanitize};
pub use schema::{BlockStarterPattern, BlockStarterSchema, MAX_PATTERN_SCAN_LEN};
pub use selector::selector_matches;
pub use tree::{ConfigNode, LineSource, Loc, NodeKind, PreOrder, preorder};
