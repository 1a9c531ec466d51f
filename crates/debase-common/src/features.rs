//! The feature record passed from the demangler adapters to the matcher.

use serde::Serialize;

/// Classification of one mangled symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Empty input or a symbol the demangler could not parse.
    Invalid,
    /// A constructor of some class type.
    Ctor,
    /// A destructor of some class type.
    Dtor,
    /// A recognised non-function entity (vtable, typeinfo, guard variable…).
    /// No features are extracted.
    Other,
    /// A well-formed symbol that is neither a constructor nor a destructor
    /// (free functions, plain methods, data). Skipped by the matcher.
    Ignorable,
}

impl SymbolKind {
    /// True for the two kinds the matcher will consider at all.
    pub const fn is_structor(self) -> bool {
        matches!(self, Self::Ctor | Self::Dtor)
    }
}

/// Features extracted from one demangled constructor or destructor symbol.
///
/// `scope_names` is the full qualified name outer-to-inner, **including**
/// `base_name` as its last element. Anonymous namespaces appear as the
/// single-byte name `"@"`. `variant` carries the Itanium ABI letter variant
/// of the structor; `0` is the deleting destructor, which the matcher
/// excludes. The Microsoft ABI has no variants and always reports `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolFeatures {
    pub scope_names: Vec<String>,
    pub base_name: String,
    pub kind: SymbolKind,
    pub variant: u8,
}

impl SymbolFeatures {
    pub const fn new() -> Self {
        Self {
            scope_names: Vec::new(),
            base_name: String::new(),
            kind: SymbolKind::Invalid,
            variant: 0,
        }
    }

    /// Reset to the state of a fresh record. Called by the adapters before
    /// every parse so stale fields never leak between symbols.
    pub fn clear(&mut self) {
        self.scope_names.clear();
        self.base_name.clear();
        self.kind = SymbolKind::Invalid;
        self.variant = 0;
    }

    /// The qualified name joined with `::`, for display only.
    pub fn qualified_name(&self) -> String {
        self.scope_names.join("::")
    }
}

impl Default for SymbolFeatures {
    fn default() -> Self {
        Self::new()
    }
}
