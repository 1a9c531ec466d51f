//! Structured errors for pattern lexing, compilation, and config loading.
//!
//! Every pattern-level variant carries the original pattern text and, where
//! it helps, the offending sub-slice, so diagnostics can be printed without
//! any surrounding context. In permissive mode the matcher downgrades these
//! to warnings and skips the offending pattern, file, or replacer.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Empty or whitespace-only pattern.
    EmptyPattern,
    /// Trailing `::`, trailing `@`, empty scope segment, or an empty group.
    BadScope { pattern: String, detail: String },
    /// Digit-leading or otherwise non-identifier literal where an
    /// identifier was required.
    BadIdentifier { pattern: String, segment: String },
    /// `{xyz.stem}` — the object is not `this`/`self`/`file`/`input`.
    UnknownReplacementObject { pattern: String, object: String },
    /// `{this.foo}` — the member is not empty/`stem`/`dir`/`ext`.
    UnknownReplacementMember { pattern: String, member: String },
    /// An escape other than `\a` `\d` `\w` `\i`.
    InvalidEscape { pattern: String, escape: String },
    /// Malformed `[...]` character class.
    InvalidCharClass {
        pattern: String,
        class: String,
        detail: String,
    },
    /// A quantifier with nothing quantifiable before it, `??`, or a glob
    /// star inside a compound segment.
    QuantifierMisuse { pattern: String, detail: String },
    /// Syntax the language reserves but does not support (capture groups).
    UnsupportedFeature { pattern: String, detail: String },
    /// A file-property lookup or substitution failed: unknown property
    /// name, `{this.*}` with no current file, or a substituted value that
    /// is not identifier-safe.
    FileProperty { context: String, detail: String },
    /// More than one `**` in a single pattern.
    MultiGlobNotImplemented { pattern: String },
    /// JSON config value of the wrong type or shape.
    ConfigShape { detail: String },
    /// Config declared neither `ctor`, `dtor`, nor `all` patterns.
    ConfigMissingPatterns,
    /// `load_config` called on a matcher that already holds a config.
    ConfigAlreadyLoaded { path: PathBuf },
}

impl PatternError {
    /// The pattern text this error is about, when there is one.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::BadScope { pattern, .. }
            | Self::BadIdentifier { pattern, .. }
            | Self::UnknownReplacementObject { pattern, .. }
            | Self::UnknownReplacementMember { pattern, .. }
            | Self::InvalidEscape { pattern, .. }
            | Self::InvalidCharClass { pattern, .. }
            | Self::QuantifierMisuse { pattern, .. }
            | Self::UnsupportedFeature { pattern, .. }
            | Self::MultiGlobNotImplemented { pattern } => Some(pattern),
            _ => None,
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern => write!(f, "empty pattern"),
            Self::BadScope { pattern, detail } => {
                write!(f, "bad scope in `{pattern}`: {detail}")
            }
            Self::BadIdentifier { pattern, segment } => {
                write!(f, "bad identifier `{segment}` in `{pattern}`")
            }
            Self::UnknownReplacementObject { pattern, object } => {
                write!(f, "unknown replacement object `{object}` in `{pattern}`")
            }
            Self::UnknownReplacementMember { pattern, member } => {
                write!(f, "unknown replacement member `{member}` in `{pattern}`")
            }
            Self::InvalidEscape { pattern, escape } => {
                write!(f, "invalid escape `{escape}` in `{pattern}`")
            }
            Self::InvalidCharClass {
                pattern,
                class,
                detail,
            } => {
                write!(f, "invalid character class `{class}` in `{pattern}`: {detail}")
            }
            Self::QuantifierMisuse { pattern, detail } => {
                write!(f, "quantifier misuse in `{pattern}`: {detail}")
            }
            Self::UnsupportedFeature { pattern, detail } => {
                write!(f, "unsupported in `{pattern}`: {detail}")
            }
            Self::FileProperty { context, detail } => {
                write!(f, "file property error in `{context}`: {detail}")
            }
            Self::MultiGlobNotImplemented { pattern } => {
                write!(
                    f,
                    "`{pattern}` uses more than one `**`: multiple globs per pattern are not yet supported"
                )
            }
            Self::ConfigShape { detail } => write!(f, "config shape error: {detail}"),
            Self::ConfigMissingPatterns => {
                write!(f, "config declares no ctor, dtor, or all patterns")
            }
            Self::ConfigAlreadyLoaded { path } => {
                write!(f, "a config was already loaded from {}", path.display())
            }
        }
    }
}

impl std::error::Error for PatternError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_pattern_text() {
        let err = PatternError::QuantifierMisuse {
            pattern: "a::b??".to_string(),
            detail: "`?` may not follow `?`".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("a::b??"));
        assert!(text.contains("may not follow"));
        assert_eq!(err.pattern(), Some("a::b??"));
    }

    #[test]
    fn config_errors_have_no_pattern() {
        assert_eq!(PatternError::ConfigMissingPatterns.pattern(), None);
        assert_eq!(
            PatternError::ConfigShape {
                detail: "x".into()
            }
            .pattern(),
            None
        );
    }
}
