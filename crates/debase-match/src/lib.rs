//! The debase pattern engine.
//!
//! Patterns are a small language over demangled C++ qualified names:
//! literal scopes (`cocos2d::CCNode`), anonymous-namespace markers (`@`),
//! scope-level globs (`**`), restricted regexes over identifier bytes, and
//! `{file.*}` / `{this.*}` substitutions from the current input file.
//!
//! Pattern text is lexed into tokens, compiled once into a node tree, and
//! matched against the scope-name features a demangler extracts. Nodes
//! that reference file properties are re-bound on every
//! [`SymbolMatcher::set_filename`].

pub mod chars;
pub mod compile;
mod config;
pub mod error;
pub mod fileprops;
pub mod lexer;
pub mod matcher;
pub mod node;
pub mod replace;
pub mod token;

pub use error::PatternError;
pub use matcher::SymbolMatcher;
