//! The configuration tree: nodes, locations, and traversal.
//!
//! A parsed configuration is a *forest* - an ordered sequence of trees whose
//! top level mirrors the top level of the source text. Nodes are created once
//! by the parser and are immutable afterwards; ownership is strictly
//! tree-shaped (owned child vectors, no parent back-references, no cycles),
//! so a forest can be shared read-only across threads for the duration of a
//! scan.
//!
//! Rule results refer to nodes only by `id` and `loc`, never by reference,
//! so results outlive the forest that produced them.

use crate::sanitize::sanitize;
use serde::{Deserialize, Serialize};

/// What a node represents in the source configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A line that opens a nested block (`interface Gi0/1`).
    Section,
    /// A leaf command (`ip address 10.0.0.1 255.255.255.0`).
    Command,
    /// Reserved. Comment lines are filtered before tree construction, so the
    /// parser never emits this kind.
    Comment,
    /// Synthetic container grouping a run of top-level orphan commands.
    VirtualRoot,
}

impl NodeKind {
    /// Wire tag for this kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Command => "command",
            Self::Comment => "comment",
            Self::VirtualRoot => "virtual_root",
        }
    }
}

/// Where the scanned text came from.
///
/// Rules may inspect this to soften checks on ad-hoc fragments: a snippet
/// legitimately lacks the surrounding context a full file would have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSource {
    /// A full configuration file.
    #[default]
    Base,
    /// An ad-hoc fragment, e.g. the region around an editor cursor.
    Snippet,
}

/// Inclusive 0-based line range covered by a node.
///
/// For a section, `end_line` extends to the last descendant. External
/// interfaces re-base as needed (SARIF wants 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loc {
    pub start_line: u32,
    pub end_line: u32,
}

impl Loc {
    /// A range covering a single line.
    #[must_use]
    pub const fn single(line: u32) -> Self {
        Self {
            start_line: line,
            end_line: line,
        }
    }
}

/// A node of the configuration tree.
///
/// Field order is the wire order used by serialized dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigNode {
    /// Sanitized textual identity of the line; what selectors match against.
    /// Synthesized only for virtual roots (`virtual_root_line_<n>`).
    pub id: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// The original line exactly as read, including leading whitespace.
    /// Empty for virtual roots. Never mutated after creation.
    pub raw_text: String,
    /// The sanitized line split on whitespace runs; `params[0]` is the head
    /// keyword.
    pub params: Vec<String>,
    /// Child nodes in source order.
    pub children: Vec<ConfigNode>,
    /// Provenance tag inherited from parser options.
    pub source: LineSource,
    /// Line range covered by this node.
    pub loc: Loc,
    /// Leading-whitespace column of the originating line.
    pub indent: u32,
}

impl ConfigNode {
    /// Build a node from one source line.
    ///
    /// `raw_text` is kept verbatim; `id` and `params` derive from its
    /// sanitized form.
    #[must_use]
    pub fn from_line(raw_text: &str, kind: NodeKind, source: LineSource, line: u32, indent: u32) -> Self {
        let id = sanitize(raw_text).into_owned();
        Self::from_sanitized(id, raw_text, kind, source, line, indent)
    }

    /// Build a node when the sanitized form is already known.
    pub(crate) fn from_sanitized(
        id: String,
        raw_text: &str,
        kind: NodeKind,
        source: LineSource,
        line: u32,
        indent: u32,
    ) -> Self {
        let params = id.split_whitespace().map(String::from).collect();
        Self {
            id,
            kind,
            raw_text: raw_text.to_string(),
            params,
            children: Vec::new(),
            source,
            loc: Loc::single(line),
            indent,
        }
    }

    /// The head keyword, if any.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_section(&self) -> bool {
        self.kind == NodeKind::Section
    }

    #[must_use]
    pub fn is_virtual_root(&self) -> bool {
        self.kind == NodeKind::VirtualRoot
    }

    /// Number of nodes in this subtree, including self.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// Iterate a forest depth-first, parents before children, siblings in order.
#[must_use]
pub fn preorder(forest: &[ConfigNode]) -> PreOrder<'_> {
    PreOrder {
        stack: forest.iter().rev().collect(),
    }
}

/// Depth-first pre-order iterator over a forest. See [`preorder`].
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<&'a ConfigNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ConfigNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
