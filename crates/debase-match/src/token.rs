//! The lexer's output: a flat vector of classified pattern tokens.

use crate::fileprops::FileProp;

/// What one token contributes to the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A literal identifier segment.
    Simple,
    /// `@` — matches an anonymous-namespace scope.
    Anonymous,
    /// `**` — matches zero or more scope segments.
    Glob,
    /// `{this.member}` that could not be resolved at lex time (no current
    /// file). The compiler rejects these.
    This,
    /// `{file.member}` — a property of the current input file, bound late.
    LateBind,
    /// Literal text with `{n}` holes, substituted on every `set_filename`.
    SimpleFmt,
    /// Regex text with no holes.
    Regex,
    /// Regex text with `{n}` holes.
    RegexFmt,
}

/// One lexed token. Compound heads (`SimpleFmt`/`RegexFmt`) are followed by
/// exactly `trailing` tokens carrying their hole arguments in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternToken {
    pub kind: TokenKind,
    /// Literal text, regex text, or the canonical replacement body
    /// (`file.stem`, `this`, …) depending on `kind`.
    pub text: String,
    /// Number of immediately-following hole-argument tokens (0–7).
    pub trailing: u8,
    /// Set on a compound head and each trailing token except the last:
    /// this token and its successor belong to one scope segment.
    pub grouped: bool,
    /// The text no longer reproduces the source segment verbatim
    /// (wildcard/escape expansion, `/…/` stripping, `{this.*}` resolution).
    pub modified: bool,
}

impl PatternToken {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            trailing: 0,
            grouped: false,
            modified: false,
        }
    }

    pub fn simple(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Simple, text)
    }

    pub fn anonymous() -> Self {
        Self::new(TokenKind::Anonymous, "@")
    }

    pub fn glob() -> Self {
        Self::new(TokenKind::Glob, "**")
    }

    /// The file property a `This`/`LateBind` token (or a compound trailer)
    /// names. Meaningless for other kinds.
    pub fn file_prop(&self) -> FileProp {
        let member = self
            .text
            .split_once('.')
            .map_or("", |(_, member)| member);
        FileProp::parse(member).unwrap_or(FileProp::Whole)
    }
}

/// Rebuild pattern text from a token stream: token texts joined by `::`,
/// except across a `grouped` boundary. Only meaningful for streams without
/// replacements; used by the round-trip tests.
pub fn reconstruct(tokens: &[PatternToken]) -> String {
    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 && !tokens[i - 1].grouped {
            out.push_str("::");
        }
        out.push_str(&tok.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_prop_from_canonical_body() {
        let tok = PatternToken::new(TokenKind::LateBind, "file.stem");
        assert_eq!(tok.file_prop(), FileProp::Stem);
        let tok = PatternToken::new(TokenKind::LateBind, "file");
        assert_eq!(tok.file_prop(), FileProp::Whole);
        let tok = PatternToken::new(TokenKind::This, "this.ext");
        assert_eq!(tok.file_prop(), FileProp::Ext);
    }

    #[test]
    fn reconstruct_inserts_separators() {
        let tokens = vec![
            PatternToken::simple("a"),
            PatternToken::anonymous(),
            PatternToken::simple("b"),
        ];
        assert_eq!(reconstruct(&tokens), "a::@::b");
    }

    #[test]
    fn reconstruct_respects_grouping() {
        // A compound head and its trailer form one scope segment: no `::`
        // between them.
        let mut head = PatternToken::new(TokenKind::SimpleFmt, "{0}X");
        head.trailing = 1;
        head.grouped = true;
        let trailer = PatternToken::new(TokenKind::LateBind, "file.stem");
        let tokens = vec![PatternToken::simple("a"), head, trailer];
        assert_eq!(reconstruct(&tokens), "a::{0}Xfile.stem");
    }
}
