//! Human-readable dumps of lexed tokens and compiled pattern trees, for
//! the `debase explain` subcommand.

use std::fmt::Write as _;

use debase_match::node::{NodeArena, NodeId, PatternNode, SinglePattern};
use debase_match::token::PatternToken;

/// One line per token: kind, text, and the grouping/trailing flags that
/// tie compound heads to their hole arguments.
pub fn render_tokens(tokens: &[PatternToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = write!(out, "{:?}\t{}", token.kind, token.text);
        if token.trailing > 0 {
            let _ = write!(out, "\t(+{} trailing)", token.trailing);
        }
        if token.grouped {
            out.push_str("\t(grouped)");
        }
        out.push('\n');
    }
    out
}

/// Indented tree dump rooted at `id`.
pub fn render_node(arena: &NodeArena, id: NodeId) -> String {
    let mut out = String::new();
    render_into(arena, id, 0, &mut out);
    out
}

fn render_into(arena: &NodeArena, id: NodeId, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match arena.get(id) {
        PatternNode::Simple { parts } => {
            let _ = writeln!(out, "{pad}Simple [{}]", parts.join("::"));
        }
        PatternNode::LeadingSimple { parts } => {
            let _ = writeln!(out, "{pad}LeadingSimple [{}::…]", parts.join("::"));
        }
        PatternNode::SingleSequence { items } => {
            let _ = writeln!(out, "{pad}SingleSequence");
            for item in items {
                render_leaf(item, depth + 1, out);
            }
        }
        PatternNode::AnySequence { items } => {
            let _ = writeln!(out, "{pad}AnySequence");
            for item in items {
                render_into(arena, *item, depth + 1, out);
            }
        }
        PatternNode::Forwarding { inner } => {
            let _ = writeln!(out, "{pad}Forwarding");
            render_leaf(inner, depth + 1, out);
        }
        PatternNode::LeadingGlob { trailing } => {
            let _ = writeln!(out, "{pad}LeadingGlob **");
            render_into(arena, *trailing, depth + 1, out);
        }
        PatternNode::ButterflyGlob { leading, trailing } => {
            let _ = writeln!(out, "{pad}ButterflyGlob");
            render_into(arena, *leading, depth + 1, out);
            let _ = writeln!(out, "{}**", "  ".repeat(depth + 1));
            render_into(arena, *trailing, depth + 1, out);
        }
    }
}

fn render_leaf(leaf: &SinglePattern, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match leaf {
        SinglePattern::Solo { literal } if literal.is_empty() => {
            let _ = writeln!(out, "{pad}Solo <unbound>");
        }
        SinglePattern::Solo { literal } => {
            let _ = writeln!(out, "{pad}Solo {literal}");
        }
        SinglePattern::Regex { source, compiled } => {
            let state = if compiled.is_some() {
                "compiled"
            } else {
                "placeholder"
            };
            let _ = writeln!(out, "{pad}Regex /{source}/ ({state})");
        }
    }
}
