//! Mangling ABI selection.
//!
//! The demangler back end is chosen from the module's target triple: MSVC
//! environments use the Microsoft scheme, everything else uses Itanium.

use std::fmt;
use std::str::FromStr;

/// Which C++ name-mangling scheme a module's symbols use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Abi {
    #[default]
    Itanium,
    Microsoft,
}

impl Abi {
    /// Pick the ABI for a target triple, e.g. `x86_64-pc-windows-msvc`.
    ///
    /// Only the environment component matters: an `msvc` suffix selects
    /// Microsoft mangling, anything else (gnu, musl, darwin, none…) is
    /// Itanium.
    pub fn from_triple(triple: &str) -> Self {
        if triple
            .rsplit('-')
            .next()
            .is_some_and(|env| env.eq_ignore_ascii_case("msvc"))
        {
            Self::Microsoft
        } else {
            Self::Itanium
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Itanium => write!(f, "itanium"),
            Self::Microsoft => write!(f, "msvc"),
        }
    }
}

impl FromStr for Abi {
    type Err = String;

    /// Accepts the short names `itanium` / `msvc` (case-insensitive) or a
    /// full target triple.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("itanium") || s.eq_ignore_ascii_case("gnu") {
            return Ok(Self::Itanium);
        }
        if s.eq_ignore_ascii_case("msvc") || s.eq_ignore_ascii_case("microsoft") {
            return Ok(Self::Microsoft);
        }
        if s.contains('-') {
            return Ok(Self::from_triple(s));
        }
        Err(format!("unknown ABI: {s} (expected itanium, msvc, or a target triple)"))
    }
}
