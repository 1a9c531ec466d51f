//! The compound lexer: scope segments containing regex syntax and/or
//! embedded replacements.
//!
//! Scans one segment byte-by-byte, tracking the class of the last atom
//! read. The scan accumulates emitted regex text plus an insertion-ordered
//! list of `{file.*}` replacement bodies; `{this.*}` bodies are resolved on
//! the spot against the current file-property cache.

use crate::chars::{self, CharClass};
use crate::error::PatternError;
use crate::fileprops::FileProps;
use crate::lexer::{canonical_body, parse_replacement, ReplObject};
use crate::token::{PatternToken, TokenKind};

use super::class;

/// Hole arguments are stored in a 3-bit field on the head token.
const MAX_REPLACEMENTS: usize = 7;

struct Scan {
    /// Emitted regex text, `{N}` placeholders included.
    out: String,
    /// Canonical `file.*` bodies in first-appearance order, deduplicated.
    replacements: Vec<String>,
    /// Class of the last atom, driving quantifier legality. `End` until
    /// the first atom is read.
    last: CharClass,
    has_regex: bool,
    has_replacements: bool,
    /// Emitted text no longer reproduces the source segment.
    modified: bool,
}

/// Lex one compound segment (slashes already stripped). On success the
/// returned vector holds the head token followed by its hole-argument
/// trailers.
///
/// `pattern` is the full pattern text, for diagnostics. `modified` marks
/// segments whose source spelling was already altered (e.g. `/…/`).
pub(crate) fn lex_segment(
    pattern: &str,
    segment: &str,
    props: Option<&FileProps>,
    modified: bool,
) -> Result<Vec<PatternToken>, PatternError> {
    let mut scan = Scan {
        out: String::with_capacity(segment.len()),
        replacements: Vec::new(),
        last: CharClass::End,
        has_regex: false,
        has_replacements: false,
        modified,
    };

    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match chars::classify(b) {
            CharClass::Identifier => {
                scan.out.push(b as char);
                scan.last = CharClass::Identifier;
                i += 1;
            }
            CharClass::OpenCurly => {
                i += replacement(pattern, &segment[i..], props, &mut scan)?;
            }
            CharClass::Wildcard => {
                scan.out.push_str("[A-Za-z0-9_$]");
                scan.has_regex = true;
                scan.modified = true;
                scan.last = CharClass::Wildcard;
                i += 1;
            }
            cls @ (CharClass::ZeroOrOne | CharClass::Kleene | CharClass::KleenePlus) => {
                quantifier(pattern, b, cls, &mut scan)?;
                i += 1;
            }
            CharClass::Escape => {
                i += escape(pattern, bytes.get(i + 1).copied(), &mut scan)?;
            }
            CharClass::OpenBrace => {
                let len = class::scan(pattern, &segment[i..])?;
                scan.out.push_str(&segment[i..i + len]);
                scan.has_regex = true;
                scan.last = CharClass::CloseBrace;
                i += len;
            }
            CharClass::OpenParen | CharClass::CloseParen => {
                return Err(PatternError::UnsupportedFeature {
                    pattern: pattern.to_string(),
                    detail: "match groups currently unsupported".to_string(),
                });
            }
            CharClass::Anonymous => {
                return Err(PatternError::UnsupportedFeature {
                    pattern: pattern.to_string(),
                    detail: "`@` must stand alone as a scope segment".to_string(),
                });
            }
            CharClass::Whitespace => {
                return Err(PatternError::BadScope {
                    pattern: pattern.to_string(),
                    detail: "whitespace inside a scope segment".to_string(),
                });
            }
            CharClass::Range | CharClass::Not => {
                return Err(PatternError::InvalidCharClass {
                    pattern: pattern.to_string(),
                    class: (b as char).to_string(),
                    detail: format!("`{}` is only valid inside a character class", b as char),
                });
            }
            CharClass::CloseBrace => {
                return Err(PatternError::InvalidCharClass {
                    pattern: pattern.to_string(),
                    class: "]".to_string(),
                    detail: "unmatched `]`".to_string(),
                });
            }
            CharClass::CloseCurly => {
                return Err(PatternError::BadScope {
                    pattern: pattern.to_string(),
                    detail: "unmatched `}`".to_string(),
                });
            }
            CharClass::End | CharClass::Unsupported => {
                return Err(PatternError::UnsupportedFeature {
                    pattern: pattern.to_string(),
                    detail: format!("byte {b:#04x} is not allowed in patterns"),
                });
            }
        }
    }

    finish(pattern, scan)
}

/// `{…}` inside a compound segment. Returns the consumed byte length.
fn replacement(
    pattern: &str,
    rest: &str,
    props: Option<&FileProps>,
    scan: &mut Scan,
) -> Result<usize, PatternError> {
    let Some(close) = rest.find('}') else {
        return Err(PatternError::BadScope {
            pattern: pattern.to_string(),
            detail: "unterminated replacement".to_string(),
        });
    };
    let body = &rest[1..close];
    if body.contains('{') {
        return Err(PatternError::BadScope {
            pattern: pattern.to_string(),
            detail: "nested `{` in replacement".to_string(),
        });
    }
    let (object, prop) = parse_replacement(pattern, body)?;
    match object {
        ReplObject::This => {
            let Some(props) = props else {
                return Err(PatternError::FileProperty {
                    context: pattern.to_string(),
                    detail: "`{this.*}` requires a current input file".to_string(),
                });
            };
            let value = props.get(prop);
            if !chars::is_identifier(value) {
                return Err(PatternError::BadIdentifier {
                    pattern: pattern.to_string(),
                    segment: value.to_string(),
                });
            }
            // Parenthesized so a following quantifier binds to the whole
            // value. Resolution alone does not make the segment a regex.
            scan.out.push('(');
            scan.out.push_str(value);
            scan.out.push(')');
            scan.modified = true;
            scan.last = CharClass::Identifier;
        }
        ReplObject::File => {
            let body = canonical_body(ReplObject::File, prop);
            let index = match scan.replacements.iter().position(|existing| *existing == body) {
                Some(index) => index,
                None => {
                    scan.replacements.push(body);
                    scan.replacements.len() - 1
                }
            };
            scan.out.push('{');
            scan.out.push_str(&index.to_string());
            scan.out.push('}');
            scan.has_replacements = true;
            scan.last = CharClass::CloseCurly;
        }
    }
    Ok(close + 1)
}

/// `?`, `*`, or `+`. Legal only after an atom, with `*?`/`+?` allowed as
/// the lazy forms.
fn quantifier(
    pattern: &str,
    byte: u8,
    cls: CharClass,
    scan: &mut Scan,
) -> Result<(), PatternError> {
    let fail = |detail: &str| PatternError::QuantifierMisuse {
        pattern: pattern.to_string(),
        detail: detail.to_string(),
    };
    match scan.last {
        CharClass::Identifier
        | CharClass::Wildcard
        | CharClass::CloseParen
        | CharClass::CloseBrace
        | CharClass::CloseCurly => {}
        CharClass::Kleene if cls == CharClass::Kleene => {
            return Err(fail("`**` glob is not allowed inside a compound segment"));
        }
        CharClass::Kleene | CharClass::KleenePlus if cls == CharClass::ZeroOrOne => {
            // Lazy quantifier: *? and +?.
        }
        CharClass::ZeroOrOne if cls == CharClass::ZeroOrOne => {
            return Err(fail("`?` may not follow `?`"));
        }
        CharClass::End => {
            return Err(fail("quantifier at segment start"));
        }
        _ => {
            return Err(fail("quantifier must follow an atom"));
        }
    }
    scan.out.push(byte as char);
    scan.has_regex = true;
    scan.last = cls;
    Ok(())
}

/// `\X`. Only the four class escapes are legal. Returns consumed length.
fn escape(pattern: &str, next: Option<u8>, scan: &mut Scan) -> Result<usize, PatternError> {
    let fail = |escape: String| PatternError::InvalidEscape {
        pattern: pattern.to_string(),
        escape,
    };
    let Some(next) = next else {
        return Err(fail("\\".to_string()));
    };
    let expansion = match next {
        b'a' => "[A-Za-z]",
        b'd' => "[0-9]",
        b'w' => "[A-Za-z0-9_]",
        b'i' => "[A-Za-z0-9_$]",
        b'n' | b'r' | b't' | b'0' => {
            // Whitespace escapes get their own message: they are never
            // meaningful in a qualified name.
            return Err(fail(format!("\\{} (whitespace)", next as char)));
        }
        _ => return Err(fail(format!("\\{}", next as char))),
    };
    scan.out.push_str(expansion);
    scan.has_regex = true;
    scan.modified = true;
    scan.last = CharClass::CloseBrace;
    Ok(2)
}

/// Collapse the finished scan into tokens.
fn finish(pattern: &str, scan: Scan) -> Result<Vec<PatternToken>, PatternError> {
    if !scan.has_regex && !scan.has_replacements {
        // Pure identifier text after resolution: a plain literal. The
        // parentheses added around resolved values are dropped.
        let text: String = scan
            .out
            .chars()
            .filter(|c| *c != '(' && *c != ')')
            .collect();
        if text.is_empty() {
            return Err(PatternError::BadScope {
                pattern: pattern.to_string(),
                detail: "empty scope segment".to_string(),
            });
        }
        let mut token = PatternToken::simple(text);
        token.modified = scan.modified;
        return Ok(vec![token]);
    }

    if scan.replacements.len() > MAX_REPLACEMENTS {
        return Err(PatternError::UnsupportedFeature {
            pattern: pattern.to_string(),
            detail: format!(
                "at most {MAX_REPLACEMENTS} replacements per segment (found {})",
                scan.replacements.len()
            ),
        });
    }

    let kind = match (scan.has_regex, scan.has_replacements) {
        (false, true) => TokenKind::SimpleFmt,
        (true, false) => TokenKind::Regex,
        _ => TokenKind::RegexFmt,
    };

    let trailer_count = scan.replacements.len();
    let mut head = PatternToken::new(kind, scan.out);
    #[allow(clippy::cast_possible_truncation)]
    {
        head.trailing = trailer_count as u8;
    }
    head.grouped = trailer_count > 0;
    head.modified = scan.modified;

    let mut tokens = Vec::with_capacity(1 + trailer_count);
    tokens.push(head);
    for (i, body) in scan.replacements.into_iter().enumerate() {
        let mut trailer = PatternToken::new(TokenKind::LateBind, body);
        trailer.grouped = i + 1 < trailer_count;
        tokens.push(trailer);
    }
    Ok(tokens)
}
