//! The symbol matcher: owns the node arena, the compile cache, the ctor
//! and dtor pattern sets, and the late-bind replacer list.
//!
//! One matcher serves a whole tool run: it is filled from config/CLI,
//! `set_filename` is called once per input module, and `matches` is
//! consulted for every structor symbol in that module.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use debase_common::{SymbolFeatures, SymbolKind};

use crate::compile;
use crate::error::PatternError;
use crate::fileprops::FileProps;
use crate::lexer;
use crate::node::{NodeArena, NodeId, PatternNode};
use crate::replace::Replacer;

pub struct SymbolMatcher {
    pub(crate) arena: NodeArena,
    pub(crate) replacers: Vec<Replacer>,
    /// Pattern text → compiled node, so identical text is compiled once
    /// and compares index-equal across the two sets.
    pub(crate) cache: HashMap<String, NodeId>,
    pub(crate) ctor_patterns: BTreeSet<NodeId>,
    pub(crate) dtor_patterns: BTreeSet<NodeId>,
    pub(crate) current_filename: Option<String>,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) permissive: bool,
    pub(crate) warnings: Vec<String>,
}

impl SymbolMatcher {
    pub fn new(permissive: bool) -> Self {
        Self {
            arena: NodeArena::new(),
            replacers: Vec::new(),
            cache: HashMap::new(),
            ctor_patterns: BTreeSet::new(),
            dtor_patterns: BTreeSet::new(),
            current_filename: None,
            config_path: None,
            permissive,
            warnings: Vec::new(),
        }
    }

    pub const fn permissive(&self) -> bool {
        self.permissive
    }

    pub fn current_filename(&self) -> Option<&str> {
        self.current_filename.as_deref()
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    /// Compile a pattern, memoized on its raw text. The returned id is
    /// stable for the life of the matcher.
    pub fn compile_pattern(&mut self, text: &str) -> Result<NodeId, PatternError> {
        if let Some(id) = self.cache.get(text) {
            return Ok(*id);
        }
        let props = self.current_filename.as_deref().map(FileProps::new);
        let tokens = lexer::lex(text, props.as_ref())?;
        let id = compile::compile(text, &tokens, &mut self.arena, &mut self.replacers)?;
        self.cache.insert(text.to_string(), id);
        Ok(id)
    }

    /// Compile and register a pattern for constructor matching.
    pub fn add_ctor_pattern(&mut self, text: &str) -> Result<NodeId, PatternError> {
        let id = self.compile_pattern(text)?;
        self.ctor_patterns.insert(id);
        Ok(id)
    }

    /// Compile and register a pattern for destructor matching.
    pub fn add_dtor_pattern(&mut self, text: &str) -> Result<NodeId, PatternError> {
        let id = self.compile_pattern(text)?;
        self.dtor_patterns.insert(id);
        Ok(id)
    }

    /// Compile and register a pattern for both sets.
    pub fn add_pattern(&mut self, text: &str) -> Result<NodeId, PatternError> {
        let id = self.compile_pattern(text)?;
        self.ctor_patterns.insert(id);
        self.dtor_patterns.insert(id);
        Ok(id)
    }

    /// Install `path` as the current input file and re-bind every
    /// late-bound leaf against its properties, in registration order.
    ///
    /// In permissive mode a failing replacer is skipped with a warning and
    /// its leaf keeps placeholder state (matching nothing).
    pub fn set_filename(&mut self, path: &str) -> Result<(), PatternError> {
        self.current_filename = Some(path.to_string());
        let cache = FileProps::new(path);
        for index in 0..self.replacers.len() {
            let result = self.replacers[index].replace(&mut self.arena, &cache);
            if let Err(err) = result {
                if self.permissive {
                    self.warn(format!("skipping late bind: {err}"));
                } else {
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Should the function these features came from be debased?
    ///
    /// Infallible: anything other than a constructor or destructor with a
    /// nonzero variant and at least one scope name is a plain `false`.
    /// Deleting destructors (Itanium variant 0) never match — the deleting
    /// body frees the object and must keep its base calls.
    pub fn matches(&self, features: &SymbolFeatures) -> bool {
        let set = match features.kind {
            SymbolKind::Ctor => &self.ctor_patterns,
            SymbolKind::Dtor => &self.dtor_patterns,
            _ => return false,
        };
        if features.variant == 0 || features.scope_names.is_empty() {
            return false;
        }
        set.iter()
            .any(|id| self.arena.get(*id).matches(&self.arena, &features.scope_names))
    }

    pub fn node(&self, id: NodeId) -> &PatternNode {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn ctor_patterns(&self) -> &BTreeSet<NodeId> {
        &self.ctor_patterns
    }

    pub fn dtor_patterns(&self) -> &BTreeSet<NodeId> {
        &self.dtor_patterns
    }

    /// Record a permissive-mode warning. Warnings go to stderr immediately
    /// and are kept for `take_warnings`.
    pub(crate) fn warn(&mut self, message: String) {
        eprintln!("[debase] warning: {message}");
        self.warnings.push(message);
    }

    /// Drain the warnings collected so far.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
