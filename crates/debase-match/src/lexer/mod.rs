//! The pattern lexer: pattern text → flat token vector.
//!
//! Scope splitting is on the literal separator `::`; each segment is
//! trimmed and classified on its own. Segment classification tries, in
//! order: plain identifier, standalone marker (`@`, `**`), standalone
//! replacement (`{obj.member}`), and finally the compound lexer.

mod class;
mod compound;

use crate::chars;
use crate::error::PatternError;
use crate::fileprops::{FileProp, FileProps};
use crate::token::{PatternToken, TokenKind};

/// Replacement objects the language knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplObject {
    /// `this` / `self` — resolved at lex time against the current file.
    This,
    /// `file` / `input` — bound late, on every `set_filename`.
    File,
}

/// Parse a replacement body (`obj` or `obj.member`, both case-insensitive).
pub(crate) fn parse_replacement(
    pattern: &str,
    body: &str,
) -> Result<(ReplObject, FileProp), PatternError> {
    let (object, member) = body.split_once('.').unwrap_or((body, ""));
    let object = if object.eq_ignore_ascii_case("this") || object.eq_ignore_ascii_case("self") {
        ReplObject::This
    } else if object.eq_ignore_ascii_case("file") || object.eq_ignore_ascii_case("input") {
        ReplObject::File
    } else {
        return Err(PatternError::UnknownReplacementObject {
            pattern: pattern.to_string(),
            object: object.to_string(),
        });
    };
    let Some(prop) = FileProp::parse(member) else {
        return Err(PatternError::UnknownReplacementMember {
            pattern: pattern.to_string(),
            member: member.to_string(),
        });
    };
    Ok((object, prop))
}

/// Canonical spelling of a replacement body, e.g. `file.stem`.
pub(crate) fn canonical_body(object: ReplObject, prop: FileProp) -> String {
    let object = match object {
        ReplObject::This => "this",
        ReplObject::File => "file",
    };
    match prop {
        FileProp::Whole => object.to_string(),
        member => format!("{object}.{}", member.name()),
    }
}

/// Tokenize one pattern. `props` is the file-property cache of the current
/// input file when one is in scope; with it, `{this.*}` references resolve
/// immediately.
pub fn lex(pattern: &str, props: Option<&FileProps>) -> Result<Vec<PatternToken>, PatternError> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(PatternError::EmptyPattern);
    }

    let bad_scope = |detail: &str| PatternError::BadScope {
        pattern: pattern.to_string(),
        detail: detail.to_string(),
    };

    // A single leading `::` is the (redundant) global-scope spelling.
    let body = trimmed.strip_prefix("::").unwrap_or(trimmed);
    if body.ends_with("::") {
        return Err(bad_scope("trailing scope resolution"));
    }
    if body.ends_with('@') && body != "@" {
        return Err(bad_scope("trailing `@`"));
    }

    let mut tokens: Vec<PatternToken> = Vec::new();
    for raw_segment in body.split("::") {
        let segment = raw_segment.trim();
        if segment.is_empty() {
            return Err(bad_scope("empty scope segment"));
        }
        lex_segment(pattern, segment, props, &mut tokens)?;
    }

    match tokens.as_slice() {
        [only] if only.kind == TokenKind::Glob => {
            return Err(bad_scope("pattern is only a glob"));
        }
        [only] if only.kind == TokenKind::Anonymous => {
            return Err(bad_scope("pattern is only an anonymous-namespace marker"));
        }
        _ => {}
    }
    Ok(tokens)
}

/// Classify one trimmed segment and push its token(s).
fn lex_segment(
    pattern: &str,
    segment: &str,
    props: Option<&FileProps>,
    tokens: &mut Vec<PatternToken>,
) -> Result<(), PatternError> {
    // 1. Plain identifier.
    if chars::is_identifier(segment) {
        if segment.as_bytes()[0].is_ascii_digit() {
            return Err(PatternError::BadIdentifier {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            });
        }
        tokens.push(PatternToken::simple(segment));
        return Ok(());
    }

    // 2. Standalone markers.
    if segment == "@" {
        tokens.push(PatternToken::anonymous());
        return Ok(());
    }
    if segment == "**" {
        // Sequential globs coalesce into one token.
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Glob) {
            tokens.push(PatternToken::glob());
        }
        return Ok(());
    }

    // 3. Standalone replacement.
    if let Some(body) = standalone_replacement(segment) {
        let (object, prop) = parse_replacement(pattern, body)?;
        match object {
            ReplObject::This if props.is_some() => {
                let value = props.map_or("", |p| p.get(prop));
                if !chars::is_identifier(value) {
                    return Err(PatternError::BadIdentifier {
                        pattern: pattern.to_string(),
                        segment: value.to_string(),
                    });
                }
                let mut token = PatternToken::simple(value);
                token.modified = true;
                tokens.push(token);
            }
            ReplObject::This => {
                tokens.push(PatternToken::new(
                    TokenKind::This,
                    canonical_body(object, prop),
                ));
            }
            ReplObject::File => {
                tokens.push(PatternToken::new(
                    TokenKind::LateBind,
                    canonical_body(object, prop),
                ));
            }
        }
        return Ok(());
    }

    // 4. Compound. A `/…/` surround is only a marker and is stripped.
    let (inner, stripped) = match segment.strip_prefix('/').and_then(|s| s.strip_suffix('/')) {
        Some(inner) if !inner.is_empty() => (inner, true),
        _ => (segment, false),
    };
    let segment_tokens = compound::lex_segment(pattern, inner, props, stripped)?;
    tokens.extend(segment_tokens);
    Ok(())
}

/// If `segment` is exactly one `{…}` replacement, return its body.
fn standalone_replacement(segment: &str) -> Option<&str> {
    let body = segment.strip_prefix('{')?.strip_suffix('}')?;
    if body.contains('{') || body.contains('}') {
        return None;
    }
    Some(body)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests_compound;
