//! Block-starter schema: which lines open a nested configuration block.
//!
//! The schema is a finite, ordered list of anchored, case-insensitive
//! patterns naming the keywords that open a block (`interface`, `router`,
//! `vlan`, `line vty`, and so on). It is pure data consulted by the parser;
//! it carries no parsing behavior of its own.
//!
//! # Matching pipeline
//!
//! A line is tested in three stages, cheapest first:
//!
//! 1. **Keyword gate** - an Aho-Corasick automaton over the schema's head
//!    keywords rejects most command lines without touching a regex.
//! 2. **Union prefilter** - a [`regex::RegexSet`] over every pattern the
//!    linear engine can express answers the common case in a single pass.
//! 3. **Lookaround fallback** - the few patterns that need backtracking
//!    (`^router (?!router-id)\S+`) are checked individually.
//!
//! The set is closed and enumerated at build time. Embedders may extend it
//! with [`BlockStarterSchema::with_extra_patterns`] *before* constructing a
//! parser; extending a schema already in use by a parse produces undefined
//! selection behavior.

use crate::regex_engine::{LazyCompiledRegex, needs_backtracking_engine};
use aho_corasick::AhoCorasick;
use memchr::memmem;
use std::sync::LazyLock;

/// Lines longer than this many codepoints skip block-starter detection.
///
/// Real block-starter lines are short; a multi-kilobyte line is data (a
/// certificate blob, a banner payload) and is parsed as a plain command.
pub const MAX_PATTERN_SCAN_LEN: usize = 4096;

/// One block-starter pattern: an anchored whole-line prefix matcher.
pub struct BlockStarterPattern {
    /// Lazily-compiled regex; anchored and case-insensitive by construction.
    pub regex: LazyCompiledRegex,
    /// Debug name for the pattern family (e.g. `interface`).
    pub name: &'static str,
}

impl std::fmt::Debug for BlockStarterPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockStarterPattern")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

/// Declare a block-starter pattern from static strings.
///
/// The pattern is lazily compiled on first use, not at construction time.
#[macro_export]
macro_rules! block_starter {
    ($name:literal, $re:literal) => {
        $crate::schema::BlockStarterPattern {
            regex: $crate::regex_engine::LazyCompiledRegex::new($re),
            name: $name,
        }
    };
}

/// Head keywords for the quick-reject gate.
///
/// A line containing none of these (ASCII-case-insensitively) cannot match
/// any built-in pattern, so regex work is skipped entirely.
const BUILTIN_KEYWORDS: &[&str] = &[
    "interface",
    "router",
    "vlan",
    "line",
    "ip",
    "ipv6",
    "class-map",
    "policy-map",
    "object-group",
    "route-map",
    "crypto",
    "dial-peer",
    "vrf",
    "banner",
    "control-plane",
];

/// The built-in pattern families, in schema order.
fn builtin_patterns() -> Vec<BlockStarterPattern> {
    vec![
        block_starter!("interface", r"(?i)^interface \S+"),
        block_starter!("router", r"(?i)^router (?!router-id)\S+"),
        block_starter!("vlan", r"(?i)^vlan \d+"),
        block_starter!("line", r"(?i)^line (vty|console|aux) \S+"),
        block_starter!("ip-access-list", r"(?i)^ip access-list \S+"),
        block_starter!("ipv6-access-list", r"(?i)^ipv6 access-list \S+"),
        block_starter!("class-map", r"(?i)^class-map \S+"),
        block_starter!("policy-map", r"(?i)^policy-map \S+"),
        block_starter!("object-group", r"(?i)^object-group \S+"),
        block_starter!("route-map", r"(?i)^route-map \S+"),
        block_starter!("crypto", r"(?i)^crypto (map|isakmp|ipsec) \S+"),
        block_starter!("dial-peer", r"(?i)^dial-peer voice \S+"),
        block_starter!("vrf-definition", r"(?i)^vrf definition \S+"),
        block_starter!("banner", r"(?i)^banner (motd|login|exec)"),
        block_starter!("control-plane", r"(?i)^control-plane"),
    ]
}

static BUILTIN_SCHEMA: LazyLock<BlockStarterSchema> =
    LazyLock::new(|| BlockStarterSchema::new(builtin_patterns(), BUILTIN_KEYWORDS));

/// An ordered, closed collection of block-starter patterns with precompiled
/// quick-reject structures.
#[derive(Debug)]
pub struct BlockStarterSchema {
    patterns: Vec<BlockStarterPattern>,

    /// Keywords for the quick-reject gate. Empty disables the gate (custom
    /// schemas may introduce head keywords the built-in list does not know).
    keywords: &'static [&'static str],

    /// Aho-Corasick automaton over `keywords`, ASCII-case-insensitive.
    keyword_matcher: Option<AhoCorasick>,

    /// Single-pass union of every pattern the linear engine can express.
    union: Option<regex::RegexSet>,

    /// True if `union` covers ALL patterns; a union miss is then definitive.
    union_is_complete: bool,

    max_scan_len: usize,
}

impl BlockStarterSchema {
    /// Build a schema from an ordered pattern list and a keyword gate.
    ///
    /// Pass an empty keyword slice to disable the gate.
    #[must_use]
    pub fn new(patterns: Vec<BlockStarterPattern>, keywords: &'static [&'static str]) -> Self {
        let linear: Vec<&str> = patterns
            .iter()
            .map(|p| p.regex.as_str())
            .filter(|p| !needs_backtracking_engine(p))
            .collect();
        let union = if linear.is_empty() {
            None
        } else {
            regex::RegexSet::new(&linear).ok()
        };
        let union_is_complete = union.is_some() && linear.len() == patterns.len();

        let keyword_matcher = if keywords.is_empty() {
            None
        } else {
            AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(keywords)
                .ok()
        };

        Self {
            patterns,
            keywords,
            keyword_matcher,
            union,
            union_is_complete,
            max_scan_len: MAX_PATTERN_SCAN_LEN,
        }
    }

    /// The built-in schema shared by every default parser.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_SCHEMA
    }

    /// The built-in schema extended with additional patterns.
    ///
    /// The keyword gate is disabled for extended schemas: extra patterns may
    /// introduce head keywords the built-in gate would wrongly reject.
    #[must_use]
    pub fn with_extra_patterns(extra: impl IntoIterator<Item = BlockStarterPattern>) -> Self {
        let mut patterns = builtin_patterns();
        patterns.extend(extra);
        Self::new(patterns, &[])
    }

    /// Override the long-line short-circuit threshold (codepoints).
    #[must_use]
    pub fn with_max_scan_len(mut self, max_scan_len: usize) -> Self {
        self.max_scan_len = max_scan_len;
        self
    }

    /// Number of patterns in schema order.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Decide whether a sanitized line opens a nested block.
    ///
    /// The line must already be sanitized; leading whitespace defeats the
    /// anchored patterns by design.
    #[must_use]
    pub fn is_block_starter(&self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }

        // Codepoint count is only measured when the byte length could exceed
        // the limit; bytes bound codepoints from above.
        if line.len() > self.max_scan_len && line.chars().count() > self.max_scan_len {
            return false;
        }

        if !self.keyword_gate(line) {
            return false;
        }

        match &self.union {
            Some(set) => {
                if set.is_match(line) {
                    return true;
                }
                if self.union_is_complete {
                    return false;
                }
                self.patterns
                    .iter()
                    .filter(|p| needs_backtracking_engine(p.regex.as_str()))
                    .any(|p| p.regex.is_match(line))
            }
            None => self.patterns.iter().any(|p| p.regex.is_match(line)),
        }
    }

    /// Quick-reject gate: does the line contain any schema keyword?
    ///
    /// False positives are fine (the regexes decide); false negatives are
    /// not, so the fallback path lowercases before the substring scan.
    fn keyword_gate(&self, line: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        if let Some(ac) = &self.keyword_matcher {
            return ac.is_match(line);
        }
        let lowered = line.to_ascii_lowercase();
        self.keywords
            .iter()
            .any(|kw| memmem::find(lowered.as_bytes(), kw.as_bytes()).is_some())
    }
}
