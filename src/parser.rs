//! Permissive, schema-aware configuration parser.
//!
//! The parser reconstructs a hierarchical tree from configuration text even
//! when indentation is missing, partial, or inconsistent - the property that
//! makes ad-hoc snippets (a few lines pasted into an editor or a ticket)
//! scannable with the same rules as full files. It never rejects input: every
//! surviving line becomes exactly one node.
//!
//! # Structure decisions
//!
//! Parent/child structure combines two signals, applied through an explicit
//! parent stack:
//!
//! - **Measured indentation** of the original line (never the sanitized one).
//!   A line dedenting to or past an enclosing command closes it.
//! - **The block-starter schema**. A block-starter line promotes itself out
//!   of any command chain, so `interface Gi0/1` pasted flat after
//!   `ip address ...` starts a sibling section instead of nesting under the
//!   command.
//!
//! A section adopts following commands at its own column while its body is
//! flat (childless, or already adopted at that column); once a section has an
//! indented body, a line back at the section's column closes it. Both
//! behaviors fall out of tracking the first-child column per stack frame.
//!
//! # Post-passes
//!
//! 1. `end_line` propagation: a section's location extends to its last
//!    descendant.
//! 2. Virtual-root wrapping: each maximal run of consecutive top-level
//!    commands is grouped under one synthetic `virtual_root` node, so orphan
//!    snippets stay addressable as a unit.

use crate::sanitize::{measure_indent, sanitize};
use crate::schema::BlockStarterSchema;
use crate::tree::{ConfigNode, LineSource, Loc, NodeKind};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

/// Options controlling a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Absolute line number of the first input line. Editor integrations
    /// scanning a sub-range pass the range start so locations stay absolute.
    pub start_line: u32,
    /// Provenance tag stamped on every node.
    pub source: LineSource,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_line: 0,
            source: LineSource::Base,
        }
    }
}

impl ParseOptions {
    /// Options for an ad-hoc fragment.
    #[must_use]
    pub const fn snippet() -> Self {
        Self {
            start_line: 0,
            source: LineSource::Snippet,
        }
    }

    /// Set the absolute line number of the first input line.
    #[must_use]
    pub const fn with_start_line(mut self, start_line: u32) -> Self {
        self.start_line = start_line;
        self
    }
}

/// Counters collected while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Total input lines, surviving or not.
    pub lines_read: usize,
    /// Lines that sanitized to empty.
    pub blank_lines: usize,
    /// Lines discarded as `!` comments.
    pub comment_lines: usize,
    /// Section nodes created.
    pub sections: usize,
    /// Command nodes created.
    pub commands: usize,
    /// Synthetic virtual roots created by the wrapper pass.
    pub virtual_roots: usize,
}

impl ParseStats {
    /// Nodes created from input lines (excludes virtual roots).
    #[must_use]
    pub const fn line_nodes(&self) -> usize {
        self.sections + self.commands
    }
}

/// Parse configuration text into a forest using the built-in schema.
///
/// Pure: no I/O, deterministic, never fails on line content.
#[must_use]
pub fn parse(text: &str, options: &ParseOptions) -> Vec<ConfigNode> {
    parse_inner(text, options, BlockStarterSchema::builtin()).0
}

/// Parse with a caller-supplied block-starter schema.
#[must_use]
pub fn parse_with_schema(
    text: &str,
    options: &ParseOptions,
    schema: &BlockStarterSchema,
) -> Vec<ConfigNode> {
    parse_inner(text, options, schema).0
}

/// Parse and report counters alongside the forest.
#[must_use]
pub fn parse_with_stats(text: &str, options: &ParseOptions) -> (Vec<ConfigNode>, ParseStats) {
    parse_inner(text, options, BlockStarterSchema::builtin())
}

/// A node still open on the parent stack.
#[derive(Debug)]
struct Frame {
    node: ConfigNode,
    /// Column of the first child attached under this node, once known.
    /// Drives the dedent decision for section bodies.
    body_indent: Option<u32>,
}

fn parse_inner(
    text: &str,
    options: &ParseOptions,
    schema: &BlockStarterSchema,
) -> (Vec<ConfigNode>, ParseStats) {
    let mut stats = ParseStats::default();
    let mut stack: SmallVec<[Frame; 8]> = SmallVec::new();
    let mut roots: Vec<ConfigNode> = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        stats.lines_read += 1;

        let sanitized = sanitize(raw);
        if sanitized.is_empty() {
            stats.blank_lines += 1;
            continue;
        }
        if sanitized.starts_with('!') {
            stats.comment_lines += 1;
            continue;
        }

        let line_no = options.start_line + index as u32;
        let indent = measure_indent(raw);
        let is_starter = schema.is_block_starter(&sanitized);

        while let Some(top) = stack.last() {
            if should_pop(indent, is_starter, top) {
                pop_frame(&mut stack, &mut roots);
            } else {
                break;
            }
        }

        let kind = if is_starter {
            stats.sections += 1;
            NodeKind::Section
        } else {
            stats.commands += 1;
            NodeKind::Command
        };
        let node = ConfigNode::from_sanitized(
            sanitized.into_owned(),
            raw,
            kind,
            options.source,
            line_no,
            indent,
        );

        if let Some(parent) = stack.last_mut() {
            if parent.body_indent.is_none() {
                parent.body_indent = Some(indent);
            }
        }
        stack.push(Frame {
            node,
            body_indent: None,
        });
    }

    while !stack.is_empty() {
        pop_frame(&mut stack, &mut roots);
    }

    for root in &mut roots {
        propagate_end_lines(root);
    }
    let forest = wrap_orphan_runs(roots, options.source, &mut stats);

    debug!(
        lines = stats.lines_read,
        sections = stats.sections,
        commands = stats.commands,
        virtual_roots = stats.virtual_roots,
        "parsed configuration"
    );
    (forest, stats)
}

/// Decide whether the line at `indent` closes the frame on top of the stack.
fn should_pop(indent: u32, is_starter: bool, top: &Frame) -> bool {
    if is_starter {
        // Promotion: a block starter is never a child of a plain command.
        // Against a section, only an indentation break closes it, so starters
        // can still nest under deeper-indented section bodies.
        top.node.kind != NodeKind::Section || indent <= top.node.indent
    } else if top.node.kind == NodeKind::Section {
        // Anything right of the section's column is inside it. At the
        // section's own column, adoption applies while the body is flat
        // (childless, or body at that same column); a section with an
        // indented body treats its own column as outside.
        indent < top.node.indent
            || (indent == top.node.indent
                && matches!(top.body_indent, Some(body) if body > top.node.indent))
    } else {
        indent <= top.node.indent
    }
}

/// Close the top frame and attach it to its parent (or the root forest).
fn pop_frame(stack: &mut SmallVec<[Frame; 8]>, roots: &mut Vec<ConfigNode>) {
    let Some(frame) = stack.pop() else { return };
    match stack.last_mut() {
        Some(parent) => parent.node.children.push(frame.node),
        None => roots.push(frame.node),
    }
}

/// Post-order sweep extending every composite node to its last descendant.
fn propagate_end_lines(node: &mut ConfigNode) {
    for child in &mut node.children {
        propagate_end_lines(child);
        if child.loc.end_line > node.loc.end_line {
            node.loc.end_line = child.loc.end_line;
        }
    }
}

/// Replace each maximal run of consecutive top-level commands with a single
/// `virtual_root` container. Sections break runs and pass through unchanged.
fn wrap_orphan_runs(
    roots: Vec<ConfigNode>,
    source: LineSource,
    stats: &mut ParseStats,
) -> Vec<ConfigNode> {
    let mut forest = Vec::with_capacity(roots.len());
    let mut run: Vec<ConfigNode> = Vec::new();

    for node in roots {
        if node.is_section() {
            flush_run(&mut run, &mut forest, source, stats);
            forest.push(node);
        } else {
            run.push(node);
        }
    }
    flush_run(&mut run, &mut forest, source, stats);
    forest
}

fn flush_run(
    run: &mut Vec<ConfigNode>,
    forest: &mut Vec<ConfigNode>,
    source: LineSource,
    stats: &mut ParseStats,
) {
    if run.is_empty() {
        return;
    }
    stats.virtual_roots += 1;
    forest.push(virtual_root(std::mem::take(run), source));
}

fn virtual_root(children: Vec<ConfigNode>, source: LineSource) -> ConfigNode {
    let start = children.first().map_or(0, |c| c.loc.start_line);
    let end = children.last().map_or(start, |c| c.loc.end_line);
    ConfigNode {
        id: format!("virtual_root_line_{start}"),
        kind: NodeKind::VirtualRoot,
        raw_text: String::new(),
        params: Vec::new(),
        children,
        source,
        loc: Loc {
            start_line: start,
            end_line: end,
        },
        indent: 0,
    }
}


#[cfg(test)]
mod proptest_invariants {
    use super::*;
    use crate::tree::preorder;
    use proptest::prelude::*;

    /// Strategy producing configuration-shaped lines: realistic commands and
    /// starters, comments, blanks, and low-entropy noise, each under a random
    /// indent.
    fn line_strategy() -> impl Strategy<Value = String> {
        let content = prop_oneof![
            Just("interface GigabitEthernet0/1".to_string()),
            Just("interface Gi0/2".to_string()),
            Just("router bgp 65000".to_string()),
            Just("vlan 100".to_string()),
            Just("ip address 10.0.0.1 255.255.255.0".to_string()),
            Just("description uplink".to_string()),
            Just("no shutdown".to_string()),
            Just("ntp server 1.1.1.1".to_string()),
            Just("! a comment".to_string()),
            Just(String::new()),
            "[a-z0-9 ./-]{0,24}",
        ];
        (0u32..4, content).prop_map(|(indent, line)| {
            format!("{}{}", " ".repeat(indent as usize), line)
        })
    }

    fn config_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(line_strategy(), 0..40).prop_map(|lines| lines.join("\n"))
    }

    fn surviving_lines(text: &str) -> Vec<&str> {
        text.split('\n')
            .filter(|raw| {
                let s = crate::sanitize::sanitize(raw);
                !s.is_empty() && !s.starts_with('!')
            })
            .collect()
    }

    fn check_structure(node: &ConfigNode, top_level: bool) {
        match node.kind {
            NodeKind::VirtualRoot => {
                assert!(top_level, "virtual root below top level");
                assert!(!node.children.is_empty());
                assert!(node.children.iter().all(|c| c.kind == NodeKind::Command));
            }
            NodeKind::Section | NodeKind::Command => {}
            NodeKind::Comment => panic!("parser emitted a comment node"),
        }
        for child in &node.children {
            // Indent strictly grows unless the parent is a section (adoption)
            // or a virtual root (synthetic).
            assert!(
                child.indent > node.indent
                    || node.kind == NodeKind::Section
                    || node.kind == NodeKind::VirtualRoot,
                "indent invariant violated: {} under {}",
                child.id,
                node.id
            );
            assert!(node.loc.start_line <= child.loc.start_line);
            assert!(node.loc.end_line >= child.loc.end_line);
            check_structure(child, false);
        }
    }

    proptest! {
        /// Parsing is deterministic.
        #[test]
        fn parse_is_deterministic(text in config_strategy()) {
            let a = parse(&text, &ParseOptions::default());
            let b = parse(&text, &ParseOptions::default());
            prop_assert_eq!(a, b);
        }

        /// Pre-order raw_text reproduces the surviving input lines in order.
        #[test]
        fn preorder_reproduces_input(text in config_strategy()) {
            let forest = parse(&text, &ParseOptions::default());
            let flattened: Vec<&str> = preorder(&forest)
                .filter(|n| !n.is_virtual_root())
                .map(|n| n.raw_text.as_str())
                .collect();
            prop_assert_eq!(flattened, surviving_lines(&text));
        }

        /// Structural invariants hold for arbitrary input: virtual roots only
        /// at top level over command runs, indent monotonicity, location
        /// containment.
        #[test]
        fn structural_invariants(text in config_strategy()) {
            let forest = parse(&text, &ParseOptions::default());
            for node in &forest {
                prop_assert!(node.kind != NodeKind::Command, "bare top-level command");
                check_structure(node, true);
            }
        }

        /// Line numbers in pre-order are strictly increasing over line nodes.
        #[test]
        fn line_numbers_increase(text in config_strategy()) {
            let forest = parse(&text, &ParseOptions::default());
            let starts: Vec<u32> = preorder(&forest)
                .filter(|n| !n.is_virtual_root())
                .map(|n| n.loc.start_line)
                .collect();
            prop_assert!(starts.windows(2).all(|w| w[0] < w[1]));
        }

        /// Parsing never panics on arbitrary unicode input.
        #[test]
        fn parse_never_panics(text in "\\PC{0,500}") {
            let _ = parse(&text, &ParseOptions::default());
            let _ = parse(&text, &ParseOptions::snippet());
        }
    }
}
