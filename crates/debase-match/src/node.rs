//! The compiled pattern tree and its matching semantics.
//!
//! Nodes live in a flat arena owned by the matcher and refer to each other
//! by index, so the tree can be rewritten in place during late binding
//! without self-referential ownership. Structure never changes after
//! compilation; only leaf text and compiled-regex state do.

use regex::Regex;

/// Index of a node in the matcher's arena.
pub type NodeId = usize;

/// Compile a segment regex anchored to the whole scope name.
pub(crate) fn compile_anchored(source: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{source})$"))
}

/// A single-segment leaf: matches exactly one scope name.
#[derive(Debug)]
pub enum SinglePattern {
    /// Literal string equality. An empty literal is a placeholder awaiting
    /// late binding and matches nothing (scope names are never empty).
    Solo { literal: String },
    /// Anchored regex. `compiled` is `None` for placeholders whose source
    /// still carries `{N}` holes; a placeholder matches nothing.
    Regex {
        source: String,
        compiled: Option<Regex>,
    },
}

impl SinglePattern {
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::Solo { literal } => !literal.is_empty() && literal == name,
            Self::Regex { compiled, .. } => {
                compiled.as_ref().is_some_and(|re| re.is_match(name))
            }
        }
    }
}

/// A compiled pattern. Fixed-count variants consume a known number of
/// scope segments; the two glob variants are variable.
#[derive(Debug)]
pub enum PatternNode {
    /// Exact literal scope list.
    Simple { parts: Vec<String> },
    /// Literal prefix of a longer scope list; the tail is someone else's
    /// problem. Only ever the leading half of a `ButterflyGlob`.
    LeadingSimple { parts: Vec<String> },
    /// One leaf per scope segment.
    SingleSequence { items: Vec<SinglePattern> },
    /// Fixed-width children concatenated left to right.
    AnySequence { items: Vec<NodeId> },
    /// Lifts a single-segment leaf into the multi-segment interface.
    Forwarding { inner: SinglePattern },
    /// `**::…` — at least one glob-consumed segment, then the tail.
    LeadingGlob { trailing: NodeId },
    /// `…::**::…` — fixed prefix and suffix, unconstrained middle.
    ButterflyGlob { leading: NodeId, trailing: NodeId },
}

/// Flat node storage.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<PatternNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: PatternNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: NodeId) -> &PatternNode {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut PatternNode {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl PatternNode {
    /// Scope segments this node consumes — exact for fixed-count nodes,
    /// the minimum for the glob variants.
    pub fn required_count(&self, arena: &NodeArena) -> usize {
        match self {
            Self::Simple { parts } | Self::LeadingSimple { parts } => parts.len(),
            Self::SingleSequence { items } => items.len(),
            Self::AnySequence { items } => items
                .iter()
                .map(|id| arena.get(*id).required_count(arena))
                .sum(),
            Self::Forwarding { .. } => 1,
            // The glob itself must consume at least one segment.
            Self::LeadingGlob { trailing } => arena.get(*trailing).required_count(arena) + 1,
            Self::ButterflyGlob { leading, trailing } => {
                arena.get(*leading).required_count(arena)
                    + arena.get(*trailing).required_count(arena)
            }
        }
    }

    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::LeadingGlob { .. } | Self::ButterflyGlob { .. })
    }

    /// Match a full scope-name list (base name included).
    pub fn matches(&self, arena: &NodeArena, names: &[String]) -> bool {
        match self {
            Self::Simple { parts } => {
                names.len() == parts.len() && Self::parts_eq(parts, names)
            }
            Self::LeadingSimple { parts } => {
                names.len() > parts.len() && Self::parts_eq(parts, &names[..parts.len()])
            }
            Self::SingleSequence { items } => {
                names.len() == items.len()
                    && items
                        .iter()
                        .zip(names)
                        .all(|(item, name)| item.matches_name(name))
            }
            Self::AnySequence { .. } => {
                names.len() == self.required_count(arena) && self.matches_exact(arena, names)
            }
            Self::Forwarding { inner } => names.len() == 1 && inner.matches_name(&names[0]),
            Self::LeadingGlob { trailing } => {
                let trailing = arena.get(*trailing);
                let count = trailing.required_count(arena);
                names.len() > count && trailing.matches_exact(arena, &names[names.len() - count..])
            }
            Self::ButterflyGlob { leading, trailing } => {
                let leading = arena.get(*leading);
                let trailing = arena.get(*trailing);
                let front = leading.required_count(arena);
                let back = trailing.required_count(arena);
                names.len() >= front + back
                    && leading.matches_exact(arena, &names[..front])
                    && trailing.matches_exact(arena, &names[names.len() - back..])
            }
        }
    }

    /// Match a slice whose length equals `required_count`. Glob variants
    /// never nest, so they have no exact form.
    fn matches_exact(&self, arena: &NodeArena, names: &[String]) -> bool {
        debug_assert_eq!(names.len(), self.required_count(arena));
        match self {
            Self::Simple { parts } | Self::LeadingSimple { parts } => {
                Self::parts_eq(parts, names)
            }
            Self::SingleSequence { items } => items
                .iter()
                .zip(names)
                .all(|(item, name)| item.matches_name(name)),
            Self::AnySequence { items } => {
                let mut rest = names;
                for id in items {
                    let child = arena.get(*id);
                    let count = child.required_count(arena);
                    if rest.len() < count || !child.matches_exact(arena, &rest[..count]) {
                        return false;
                    }
                    rest = &rest[count..];
                }
                rest.is_empty()
            }
            Self::Forwarding { inner } => inner.matches_name(&names[0]),
            Self::LeadingGlob { .. } | Self::ButterflyGlob { .. } => false,
        }
    }

    fn parts_eq(parts: &[String], names: &[String]) -> bool {
        parts.iter().zip(names).all(|(part, name)| part == name)
    }
}
