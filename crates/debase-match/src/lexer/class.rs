//! Validation of `[...]` character classes in compound segments.
//!
//! The accepted language is a restriction of the regex crate's bracket
//! syntax: plain identifier bytes, ranges that stay inside one case pool,
//! an optional leading `^`, and embedded POSIX classes. A validated class
//! is copied verbatim into the emitted regex text.

use crate::chars::is_identifier_byte;
use crate::error::PatternError;

/// POSIX class names the language accepts.
const POSIX_NAMES: &[&str] = &["upper", "lower", "alpha", "digit", "alnum", "xdigit"];

/// The three case-preserving range pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    Upper,
    Lower,
    Digit,
}

fn pool_of(byte: u8) -> Option<Pool> {
    match byte {
        b'A'..=b'Z' => Some(Pool::Upper),
        b'a'..=b'z' => Some(Pool::Lower),
        b'0'..=b'9' => Some(Pool::Digit),
        _ => None,
    }
}

/// Scan a character class starting at `rest[0] == '['`. Returns the total
/// byte length of the class including the closing `]`.
///
/// `pattern` is the full pattern text, carried for diagnostics only.
pub(crate) fn scan(pattern: &str, rest: &str) -> Result<usize, PatternError> {
    let bytes = rest.as_bytes();
    debug_assert_eq!(bytes.first(), Some(&b'['));

    let fail = |upto: usize, detail: &str| PatternError::InvalidCharClass {
        pattern: pattern.to_string(),
        class: rest[..upto.min(rest.len())].to_string(),
        detail: detail.to_string(),
    };

    let mut i = 1;
    if bytes.get(i) == Some(&b'^') {
        i += 1;
    }

    // One entry per plain character still eligible as a range start.
    let mut prev_char: Option<u8> = None;
    let mut has_content = false;

    loop {
        let Some(&b) = bytes.get(i) else {
            return Err(fail(rest.len(), "unterminated character class"));
        };
        match b {
            b']' => {
                if !has_content {
                    return Err(fail(i + 1, "empty character class"));
                }
                return Ok(i + 1);
            }
            b'[' => {
                // Only an embedded POSIX block may open a bracket here.
                if bytes.get(i + 1) != Some(&b':') {
                    return Err(fail(i + 2, "nested character classes are not supported"));
                }
                let Some(end) = rest[i + 2..].find(":]") else {
                    return Err(fail(rest.len(), "unterminated POSIX class"));
                };
                let name = &rest[i + 2..i + 2 + end];
                if !POSIX_NAMES.contains(&name) {
                    return Err(fail(
                        i + 4 + end,
                        &format!("unknown POSIX class `[:{name}:]`"),
                    ));
                }
                i += 2 + end + 2;
                prev_char = None;
                has_content = true;
            }
            b'-' => {
                let Some(start) = prev_char else {
                    return Err(fail(i + 1, "`-` needs a plain character on its left"));
                };
                let Some(&end) = bytes.get(i + 1) else {
                    return Err(fail(rest.len(), "unterminated character class"));
                };
                if end == b']' {
                    return Err(fail(i + 2, "`-` needs a plain character on its right"));
                }
                if !is_identifier_byte(end) {
                    return Err(fail(i + 2, "range endpoint must be an identifier byte"));
                }
                match (pool_of(start), pool_of(end)) {
                    (Some(a), Some(b)) if a == b => {
                        if start > end {
                            return Err(fail(i + 2, "reversed range"));
                        }
                    }
                    _ => {
                        return Err(fail(
                            i + 2,
                            "ranges must stay inside one of A-Z, a-z, 0-9",
                        ));
                    }
                }
                i += 2;
                prev_char = None;
            }
            _ if is_identifier_byte(b) => {
                prev_char = Some(b);
                has_content = true;
                i += 1;
            }
            _ => {
                return Err(fail(
                    i + 1,
                    &format!("`{}` is not allowed in a character class", b as char),
                ));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scan_ok(class: &str) -> usize {
        scan(class, class).unwrap()
    }

    fn scan_err(class: &str) -> PatternError {
        scan(class, class).unwrap_err()
    }

    #[test]
    fn plain_characters() {
        assert_eq!(scan_ok("[abc]"), 5);
        assert_eq!(scan_ok("[_$X9]"), 6);
    }

    #[test]
    fn class_length_ignores_trailing_text() {
        assert_eq!(scan("[ab]cd", "[ab]cd").unwrap(), 4);
    }

    #[test]
    fn negation() {
        assert_eq!(scan_ok("[^abc]"), 6);
    }

    #[test]
    fn in_pool_ranges() {
        assert_eq!(scan_ok("[A-Z]"), 5);
        assert_eq!(scan_ok("[a-z0-9]"), 8);
        assert_eq!(scan_ok("[a-cx-z]"), 8);
    }

    #[test]
    fn cross_pool_range_rejected() {
        let err = scan_err("[0-z]");
        assert!(matches!(err, PatternError::InvalidCharClass { .. }));
        assert!(err.to_string().contains("pool") || err.to_string().contains("A-Z"));
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(matches!(
            scan_err("[z-a]"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn empty_classes_rejected() {
        assert!(matches!(
            scan_err("[]"),
            PatternError::InvalidCharClass { .. }
        ));
        assert!(matches!(
            scan_err("[^]"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn dangling_dash_rejected() {
        assert!(matches!(
            scan_err("[-a]"),
            PatternError::InvalidCharClass { .. }
        ));
        assert!(matches!(
            scan_err("[a-]"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn unterminated_rejected() {
        assert!(matches!(
            scan_err("[abc"),
            PatternError::InvalidCharClass { .. }
        ));
        assert!(matches!(
            scan_err("[a-"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn posix_classes() {
        assert_eq!(scan_ok("[[:upper:]]"), 11);
        assert_eq!(scan_ok("[[:lower:]]"), 11);
        assert_eq!(scan_ok("[x[:digit:]y]"), 13);
        assert_eq!(scan_ok("[[:alnum:][:xdigit:]]"), 21);
    }

    #[test]
    fn unknown_posix_class_rejected() {
        let err = scan_err("[[:space:]]");
        assert!(err.to_string().contains("space"));
    }

    #[test]
    fn unterminated_posix_class_rejected() {
        assert!(matches!(
            scan_err("[[:upper]"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn nested_class_rejected() {
        assert!(matches!(
            scan_err("[[abc]]"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn posix_block_is_not_a_range_endpoint() {
        assert!(matches!(
            scan_err("[[:upper:]-z]"),
            PatternError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn non_identifier_byte_rejected() {
        assert!(matches!(
            scan_err("[a.b]"),
            PatternError::InvalidCharClass { .. }
        ));
        assert!(matches!(
            scan_err("[a b]"),
            PatternError::InvalidCharClass { .. }
        ));
    }
}
