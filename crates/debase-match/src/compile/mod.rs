//! The pattern compiler: token vector → node tree.
//!
//! Compilation is two passes: tokens are first grouped into scope-segment
//! groups (absorbing leading globs into the group that follows them), then
//! the group list is dispatched on its glob count.

use crate::error::PatternError;
use crate::fileprops::FileProp;
use crate::node::{compile_anchored, NodeArena, NodeId, PatternNode, SinglePattern};
use crate::replace::{Replacer, ReplacerTarget, Template};
use crate::token::{PatternToken, TokenKind};

/// One scope-segment group.
#[derive(Debug)]
struct Group<'t> {
    tokens: &'t [PatternToken],
    /// Every token is a literal or the anonymous marker.
    all_simple: bool,
    /// A single compound head plus its hole-argument trailers.
    replacement: bool,
    /// A `**` was consumed into this group.
    leading_glob: bool,
}

/// Compile a lexed pattern into the arena. Replacers for late-bound leaves
/// are appended to `replacers` in encounter order.
pub fn compile(
    pattern: &str,
    tokens: &[PatternToken],
    arena: &mut NodeArena,
    replacers: &mut Vec<Replacer>,
) -> Result<NodeId, PatternError> {
    let compiler = Compiler {
        pattern,
        arena,
        replacers,
    };
    compiler.run(tokens)
}

struct Compiler<'a> {
    pattern: &'a str,
    arena: &'a mut NodeArena,
    replacers: &'a mut Vec<Replacer>,
}

impl Compiler<'_> {
    fn run(mut self, tokens: &[PatternToken]) -> Result<NodeId, PatternError> {
        let groups = self.group(tokens)?;
        let glob_count = groups.iter().filter(|g| g.leading_glob).count();
        match glob_count {
            0 => self.zero_glob(&groups),
            1 if groups[0].leading_glob => {
                let trailing = self.zero_glob(&groups)?;
                Ok(self.arena.alloc(PatternNode::LeadingGlob { trailing }))
            }
            1 => {
                // Interior glob: everything before the flagged group forms
                // the butterfly's leading half, the rest its trailing half.
                let split = groups
                    .iter()
                    .position(|g| g.leading_glob)
                    .unwrap_or_default();
                let leading = self.leading_half(&groups[..split])?;
                let trailing = self.zero_glob(&groups[split..])?;
                Ok(self
                    .arena
                    .alloc(PatternNode::ButterflyGlob { leading, trailing }))
            }
            _ => Err(PatternError::MultiGlobNotImplemented {
                pattern: self.pattern.to_string(),
            }),
        }
    }

    /// Split the token stream into scope-segment groups.
    fn group<'t>(&self, tokens: &'t [PatternToken]) -> Result<Vec<Group<'t>>, PatternError> {
        let bad_scope = |detail: &str| PatternError::BadScope {
            pattern: self.pattern.to_string(),
            detail: detail.to_string(),
        };

        let mut groups = Vec::new();
        let mut pending_glob = false;
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.kind == TokenKind::Glob {
                pending_glob = true;
                i += 1;
                continue;
            }
            let leading_glob = std::mem::take(&mut pending_glob);
            if token.trailing > 0 {
                let end = i + 1 + token.trailing as usize;
                if end > tokens.len() {
                    return Err(bad_scope("compound head is missing its hole arguments"));
                }
                groups.push(Group {
                    tokens: &tokens[i..end],
                    all_simple: false,
                    replacement: true,
                    leading_glob,
                });
                i = end;
            } else {
                let start = i;
                while i < tokens.len()
                    && tokens[i].trailing == 0
                    && matches!(
                        tokens[i].kind,
                        TokenKind::Simple
                            | TokenKind::Anonymous
                            | TokenKind::This
                            | TokenKind::LateBind
                            | TokenKind::Regex
                    )
                {
                    i += 1;
                }
                let slice = &tokens[start..i];
                groups.push(Group {
                    tokens: slice,
                    all_simple: slice
                        .iter()
                        .all(|t| matches!(t.kind, TokenKind::Simple | TokenKind::Anonymous)),
                    replacement: false,
                    leading_glob,
                });
            }
        }

        if pending_glob {
            return Err(bad_scope("`**` with nothing after it"));
        }
        if groups.is_empty() {
            return Err(bad_scope("empty group"));
        }
        Ok(groups)
    }

    /// Compile a glob-free group list.
    fn zero_glob(&mut self, groups: &[Group<'_>]) -> Result<NodeId, PatternError> {
        if let [only] = groups {
            return self.group_node(only);
        }
        let mut items = Vec::with_capacity(groups.len());
        for group in groups {
            items.push(self.group_node(group)?);
        }
        Ok(self.arena.alloc(PatternNode::AnySequence { items }))
    }

    /// Compile the leading half of a butterfly. An all-simple half becomes
    /// `LeadingSimple` — its tail is consumed by the glob.
    fn leading_half(&mut self, groups: &[Group<'_>]) -> Result<NodeId, PatternError> {
        if let [only] = groups {
            if only.all_simple {
                let parts = only.tokens.iter().map(|t| t.text.clone()).collect();
                return Ok(self.arena.alloc(PatternNode::LeadingSimple { parts }));
            }
        }
        self.zero_glob(groups)
    }

    /// `make_dispatch`: build the node for one group.
    fn group_node(&mut self, group: &Group<'_>) -> Result<NodeId, PatternError> {
        if group.replacement {
            return self.replacement_node(group);
        }
        if group.all_simple {
            let parts = group.tokens.iter().map(|t| t.text.clone()).collect();
            return Ok(self.arena.alloc(PatternNode::Simple { parts }));
        }
        self.sequence_node(group)
    }

    /// A single compound head plus trailers: a one-segment leaf wired to a
    /// fresh replacer.
    fn replacement_node(&mut self, group: &Group<'_>) -> Result<NodeId, PatternError> {
        let head = &group.tokens[0];
        let props: Vec<FileProp> = group.tokens[1..]
            .iter()
            .map(PatternToken::file_prop)
            .collect();
        let template = Template::parse(&head.text, &props);
        let inner = match head.kind {
            TokenKind::SimpleFmt => SinglePattern::Solo {
                literal: String::new(),
            },
            TokenKind::RegexFmt => SinglePattern::Regex {
                source: head.text.clone(),
                compiled: None,
            },
            _ => {
                return Err(PatternError::BadScope {
                    pattern: self.pattern.to_string(),
                    detail: "replacement group without a compound head".to_string(),
                });
            }
        };
        let node = self.arena.alloc(PatternNode::Forwarding { inner });
        self.replacers.push(Replacer {
            target: ReplacerTarget { node, item: None },
            template,
            pattern: self.pattern.to_string(),
        });
        Ok(node)
    }

    /// A mixed group: one leaf per token.
    fn sequence_node(&mut self, group: &Group<'_>) -> Result<NodeId, PatternError> {
        let mut items = Vec::with_capacity(group.tokens.len());
        let mut late_bound: Vec<(usize, FileProp)> = Vec::new();
        for (index, token) in group.tokens.iter().enumerate() {
            let leaf = match token.kind {
                TokenKind::Simple | TokenKind::Anonymous => SinglePattern::Solo {
                    literal: token.text.clone(),
                },
                TokenKind::Regex => {
                    let compiled = compile_anchored(&token.text).map_err(|e| {
                        PatternError::UnsupportedFeature {
                            pattern: self.pattern.to_string(),
                            detail: format!("regex `{}` failed to compile: {e}", token.text),
                        }
                    })?;
                    SinglePattern::Regex {
                        source: token.text.clone(),
                        compiled: Some(compiled),
                    }
                }
                TokenKind::LateBind => {
                    late_bound.push((index, token.file_prop()));
                    SinglePattern::Solo {
                        literal: String::new(),
                    }
                }
                TokenKind::This => {
                    return Err(PatternError::FileProperty {
                        context: self.pattern.to_string(),
                        detail: "`{this.*}` requires a current input file".to_string(),
                    });
                }
                TokenKind::Glob | TokenKind::SimpleFmt | TokenKind::RegexFmt => {
                    return Err(PatternError::BadScope {
                        pattern: self.pattern.to_string(),
                        detail: "misplaced token in scope group".to_string(),
                    });
                }
            };
            items.push(leaf);
        }

        // Single-leaf groups still get the one-segment interface; a lone
        // Forwarding and a one-item sequence match identically, but the
        // sequence keeps item slots addressable for late binding.
        let node = self.arena.alloc(PatternNode::SingleSequence { items });
        for (index, prop) in late_bound {
            self.replacers.push(Replacer {
                target: ReplacerTarget {
                    node,
                    item: Some(index),
                },
                template: Template::hole(prop),
                pattern: self.pattern.to_string(),
            });
        }
        Ok(node)
    }
}
