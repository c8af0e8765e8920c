//! Line sanitization for configuration text.
//!
//! Vendor configurations copied out of terminals, wikis, and ticket systems
//! frequently carry exotic Unicode whitespace (non-breaking spaces, ideographic
//! spaces, the U+2000 block) that breaks naive tokenization. This module
//! normalizes those codepoints to plain ASCII space and trims the result, so
//! every downstream decision (block-starter matching, selector matching,
//! parameter splitting) sees one canonical form.
//!
//! # Design principles
//!
//! - **Conservative**: Only whitespace is rewritten; every other codepoint is
//!   preserved exactly.
//! - **Non-destructive**: The original line is kept verbatim on the node as
//!   `raw_text`; sanitization feeds parsing decisions only.
//! - **Allocation-free on the happy path**: Clean lines come back as
//!   `Cow::Borrowed`.

use std::borrow::Cow;

/// Codepoints normalized to U+0020 before any parsing decision.
///
/// The set is closed: U+00A0 (NBSP), the U+2000..U+200A en/em-space block,
/// U+202F (narrow NBSP), U+205F (medium mathematical space), and U+3000
/// (ideographic space).
#[inline]
#[must_use]
pub const fn is_exotic_space(c: char) -> bool {
    matches!(
        c,
        '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Sanitize one line: exotic whitespace to ASCII space, then trim both ends.
///
/// Pure, total, O(n). Idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
/// Returns `Cow::Borrowed` when no exotic whitespace is present.
#[must_use]
pub fn sanitize(line: &str) -> Cow<'_, str> {
    if line.chars().any(is_exotic_space) {
        let mapped: String = line
            .chars()
            .map(|c| if is_exotic_space(c) { ' ' } else { c })
            .collect();
        Cow::Owned(mapped.trim().to_string())
    } else {
        Cow::Borrowed(line.trim())
    }
}

/// Measure the leading-whitespace column of the *original* line.
///
/// Counts codepoints up to the first non-whitespace character. Tabs count as
/// one column each; no tab expansion is performed. A line that is entirely
/// whitespace measures as its full length, but such lines never survive
/// preprocessing.
#[must_use]
pub fn measure_indent(raw: &str) -> u32 {
    raw.chars().take_while(|c| c.is_whitespace()).count() as u32
}
