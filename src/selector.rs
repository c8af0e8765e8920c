//! Selector matching: which nodes a rule applies to.
//!
//! A selector is an ASCII-case-insensitive prefix test with a whitespace
//! right-boundary against `node.id`. The boundary prevents `"ip"` from
//! selecting `"ipv6 address ..."` while still selecting
//! `"ip address 10.0.0.1 ..."`. This is deliberately not a query language;
//! rules treat the selector as opaque, so a richer grammar can replace this
//! module without touching rule code.

/// Decide whether a node id satisfies a rule's selector.
///
/// - `None` matches every node.
/// - A present-but-empty selector, or one with leading whitespace, matches
///   nothing (selector misuse is never an error).
/// - Otherwise the id must equal the selector or start with it followed by a
///   whitespace codepoint. Comparison is ASCII-case-insensitive; non-ASCII
///   is compared codepoint-for-codepoint.
#[must_use]
pub fn selector_matches(node_id: &str, selector: Option<&str>) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    if selector.is_empty() || selector.starts_with(char::is_whitespace) {
        return false;
    }
    id_has_prefix_at_boundary(node_id, selector)
}

fn id_has_prefix_at_boundary(id: &str, prefix: &str) -> bool {
    if id.len() < prefix.len() {
        return false;
    }
    // Byte-wise ASCII-case-insensitive prefix comparison. Matching bytes on a
    // valid UTF-8 prefix guarantee the cut lands on a char boundary, but the
    // guard keeps the slice panic-free for any input.
    if !id.is_char_boundary(prefix.len()) {
        return false;
    }
    if !id.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()) {
        return false;
    }
    match id[prefix.len()..].chars().next() {
        None => true,
        Some(c) => c.is_whitespace(),
    }
}
