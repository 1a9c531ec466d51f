//! Late binding: rewriting pattern leaves when the current file changes.
//!
//! A replacer owns a mini-template of alternating literal and hole pieces
//! plus the address of its target leaf. On every `set_filename` the matcher
//! renders each template against the fresh file-property cache and rewrites
//! the leaf: a `Solo` gets new literal text, a `Regex` gets new source text
//! and is recompiled.

use crate::chars;
use crate::error::PatternError;
use crate::fileprops::{FileProp, FileProps};
use crate::node::{compile_anchored, NodeArena, NodeId, PatternNode, SinglePattern};

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Literal(String),
    Hole(FileProp),
}

/// The literal-and-hole split of a compound head's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse head text whose `{N}` placeholders index into `props`.
    ///
    /// The head text was produced by the compound lexer, so placeholders
    /// are always well-formed and in range.
    pub fn parse(text: &str, props: &[FileProp]) -> Self {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut rest = text;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            let index: usize = match rest[open + 1..open + close].parse() {
                Ok(n) => n,
                Err(_) => {
                    literal.push_str(&rest[..open + close + 1]);
                    rest = &rest[open + close + 1..];
                    continue;
                }
            };
            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Hole(
                props.get(index).copied().unwrap_or(FileProp::Whole),
            ));
            rest = &rest[open + close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Self { pieces }
    }

    /// A template that is one bare hole (a standalone `{file.*}` segment).
    pub fn hole(prop: FileProp) -> Self {
        Self {
            pieces: vec![Piece::Hole(prop)],
        }
    }

    /// Render for a literal target: plain concatenation.
    pub fn render(&self, cache: &FileProps) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Hole(prop) => out.push_str(cache.get(*prop)),
            }
        }
        out
    }

    /// Render for a regex target: hole values are parenthesized so a
    /// following quantifier binds to the whole value.
    pub fn render_regex(&self, cache: &FileProps) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Hole(prop) => {
                    out.push('(');
                    out.push_str(cache.get(*prop));
                    out.push(')');
                }
            }
        }
        out
    }
}

/// Address of a rewritable leaf: a `Forwarding` node's inner leaf, or one
/// item of a `SingleSequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacerTarget {
    pub node: NodeId,
    pub item: Option<usize>,
}

/// A registered late-bind substitution.
#[derive(Debug)]
pub struct Replacer {
    pub target: ReplacerTarget,
    pub template: Template,
    /// The pattern this replacer came from, for diagnostics.
    pub pattern: String,
}

impl Replacer {
    /// Rewrite the target leaf from the current file's properties.
    pub fn replace(&self, arena: &mut NodeArena, cache: &FileProps) -> Result<(), PatternError> {
        let leaf = Self::leaf_mut(arena.get_mut(self.target.node), self.target.item);
        match leaf {
            SinglePattern::Solo { literal } => {
                let value = self.template.render(cache);
                if !chars::is_identifier(&value) {
                    return Err(PatternError::FileProperty {
                        context: self.pattern.clone(),
                        detail: format!("substituted value `{value}` is not an identifier"),
                    });
                }
                *literal = value;
                Ok(())
            }
            SinglePattern::Regex { source, compiled } => {
                let rendered = self.template.render_regex(cache);
                match compile_anchored(&rendered) {
                    Ok(re) => {
                        *source = rendered;
                        *compiled = Some(re);
                        Ok(())
                    }
                    Err(e) => {
                        // Leave the leaf a placeholder rather than matching
                        // with stale state.
                        *compiled = None;
                        Err(PatternError::FileProperty {
                            context: self.pattern.clone(),
                            detail: format!("regex `{rendered}` failed to compile: {e}"),
                        })
                    }
                }
            }
        }
    }

    fn leaf_mut(node: &mut PatternNode, item: Option<usize>) -> &mut SinglePattern {
        match (node, item) {
            (PatternNode::Forwarding { inner }, None) => inner,
            (PatternNode::SingleSequence { items }, Some(index)) => &mut items[index],
            // Targets are created by the compiler alongside their nodes;
            // any other shape is a compiler bug.
            _ => unreachable!("replacer target does not address a leaf"),
        }
    }
}
