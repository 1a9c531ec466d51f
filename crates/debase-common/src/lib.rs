pub mod abi;
pub mod features;

pub use abi::Abi;
pub use features::{SymbolFeatures, SymbolKind};

/// A demangler back end: turns one mangled symbol into [`SymbolFeatures`].
///
/// Implementations never fail loudly — unparseable input yields
/// [`SymbolKind::Invalid`] with cleared output, and the caller skips the
/// symbol. The returned kind always equals `out.kind`.
pub trait Demangler {
    fn classify(&self, mangled: &str, out: &mut SymbolFeatures) -> SymbolKind;
}
