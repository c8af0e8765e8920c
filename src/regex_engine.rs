//! Dual regex engine abstraction for block-starter matching.
//!
//! Almost every block-starter pattern is a plain anchored prefix matcher and
//! compiles on the linear-time `regex` crate, which guarantees O(n) matching
//! with no pathological backtracking. A small number of patterns need
//! negative lookahead (`^router (?!router-id)\S+` must not treat the
//! `router-id` sub-command as a new routing-process block) and those fall back
//! to `fancy_regex`.
//!
//! [`CompiledRegex`] auto-selects the engine per pattern;
//! [`LazyCompiledRegex`] defers compilation to first use so constructing a
//! schema costs nothing until a line is actually tested.

use std::sync::OnceLock;

/// A compiled regex that auto-selects between linear-time and backtracking
/// engines.
#[derive(Debug)]
pub enum CompiledRegex {
    /// Linear-time regex (O(n) guaranteed, no backtracking).
    Linear(regex::Regex),
    /// Backtracking regex (supports lookahead/lookbehind).
    Backtracking(fancy_regex::Regex),
}

impl CompiledRegex {
    /// Compile a pattern, auto-selecting the appropriate engine.
    ///
    /// Uses the linear-time `regex` crate unless the pattern contains
    /// lookaround or backreferences.
    ///
    /// # Errors
    /// Returns an error string if the pattern fails to compile.
    pub fn new(pattern: &str) -> Result<Self, String> {
        if needs_backtracking_engine(pattern) {
            fancy_regex::Regex::new(pattern)
                .map(Self::Backtracking)
                .map_err(|e| format!("fancy_regex compile error: {e}"))
        } else {
            regex::Regex::new(pattern)
                .map(Self::Linear)
                .map_err(|e| format!("regex compile error: {e}"))
        }
    }

    /// Check if the pattern matches the text.
    ///
    /// For the backtracking engine, returns `false` on execution errors.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Linear(re) => re.is_match(text),
            Self::Backtracking(re) => re.is_match(text).unwrap_or(false),
        }
    }

    /// Get the pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linear(re) => re.as_str(),
            Self::Backtracking(re) => re.as_str(),
        }
    }

    /// Check if this regex uses the backtracking engine.
    #[must_use]
    pub const fn uses_backtracking(&self) -> bool {
        matches!(self, Self::Backtracking(_))
    }
}

/// Check if a pattern requires the backtracking engine.
///
/// Returns `true` for lookaround (`(?=`, `(?!`, `(?<=`, `(?<!`, `(?>`) and
/// backreferences (`\1`..`\9`). The check is a syntax heuristic; a false
/// positive merely selects the slower engine.
#[must_use]
pub fn needs_backtracking_engine(pattern: &str) -> bool {
    if pattern.contains("(?=")
        || pattern.contains("(?!")
        || pattern.contains("(?<=")
        || pattern.contains("(?<!")
        || pattern.contains("(?>")
    {
        return true;
    }

    let bytes = pattern.as_bytes();
    for i in 0..bytes.len().saturating_sub(1) {
        if bytes[i] == b'\\' && bytes[i + 1].is_ascii_digit() && bytes[i + 1] != b'0' {
            return true;
        }
    }

    false
}

/// A lazily-compiled regex pattern.
///
/// Stores the pattern text and defers compilation to first use behind a
/// [`OnceLock`]. Compilation failures fail open: `is_match` returns `false`.
/// This keeps schema construction O(1) per pattern and lets the whole
/// built-in table live in a `static`.
#[derive(Debug)]
pub struct LazyCompiledRegex {
    pattern: PatternText,
    compiled: OnceLock<Result<CompiledRegex, String>>,
}

#[derive(Debug)]
enum PatternText {
    Static(&'static str),
    Owned(String),
}

impl PatternText {
    fn as_str(&self) -> &str {
        match self {
            Self::Static(pattern) => pattern,
            Self::Owned(pattern) => pattern.as_str(),
        }
    }
}

impl LazyCompiledRegex {
    /// Create a lazy pattern from a static string. `const`, no compilation.
    #[must_use]
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern: PatternText::Static(pattern),
            compiled: OnceLock::new(),
        }
    }

    /// Create a lazy pattern from an owned string (runtime schema extension).
    #[must_use]
    pub fn new_owned(pattern: String) -> Self {
        Self {
            pattern: PatternText::Owned(pattern),
            compiled: OnceLock::new(),
        }
    }

    fn get_compiled(&self) -> Option<&CompiledRegex> {
        self.compiled
            .get_or_init(|| CompiledRegex::new(self.pattern.as_str()))
            .as_ref()
            .ok()
    }

    /// Check if the pattern matches the text, compiling on first use.
    ///
    /// Returns `false` on compile or execution errors.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.get_compiled()
            .is_some_and(|compiled| compiled.is_match(haystack))
    }

    /// Get the pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Check if the regex has been compiled (test hook for laziness).
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        matches!(self.compiled.get(), Some(Ok(_)))
    }
}
