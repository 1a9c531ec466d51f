//! Demangler adapters for the debase matcher.
//!
//! Two back ends share the [`Demangler`] contract from `debase-common`:
//! one for the Itanium ABI, one for the Microsoft ABI. The back end is
//! chosen from the input module's target triple.

mod itanium;
mod msvc;

use debase_common::{Abi, Demangler};

pub use itanium::ItaniumDemangler;
pub use msvc::MicrosoftDemangler;

static ITANIUM: ItaniumDemangler = ItaniumDemangler;
static MICROSOFT: MicrosoftDemangler = MicrosoftDemangler;

/// The demangler back end for an ABI. Borrowed, not owned: the matcher's
/// consumer holds a reference for the lifetime of a run.
pub fn demangler_for(abi: Abi) -> &'static dyn Demangler {
    match abi {
        Abi::Itanium => &ITANIUM,
        Abi::Microsoft => &MICROSOFT,
    }
}
