//! Itanium-ABI symbol classification.
//!
//! This is not a general demangler: it parses exactly enough of the
//! Itanium grammar to classify a symbol and, for constructors and
//! destructors, extract the scope chain, class name, and ABI variant.
//! Anything outside the subset (local names, unresolvable substitutions,
//! literal-bearing template arguments) classifies as `Invalid`, which the
//! matcher skips.

use debase_common::{Demangler, SymbolFeatures, SymbolKind};

/// Source-name spelling of an anonymous namespace.
const ANON_NAMESPACE: &str = "_GLOBAL__N";

/// The matcher-facing spelling of an anonymous namespace scope.
pub(crate) const ANON_SCOPE: &str = "@";

pub struct ItaniumDemangler;

impl Demangler for ItaniumDemangler {
    fn classify(&self, mangled: &str, out: &mut SymbolFeatures) -> SymbolKind {
        out.clear();
        let kind = parse(mangled, out).unwrap_or(SymbolKind::Invalid);
        if !kind.is_structor() {
            // Only structors carry features.
            out.scope_names.clear();
            out.base_name.clear();
            out.variant = 0;
        }
        out.kind = kind;
        kind
    }
}

/// `None` means parse failure, surfaced as `Invalid`.
fn parse(mangled: &str, out: &mut SymbolFeatures) -> Option<SymbolKind> {
    if mangled.is_empty() {
        return None;
    }
    // Mach-O adds a second leading underscore.
    let encoding = mangled
        .strip_prefix("__Z")
        .or_else(|| mangled.strip_prefix("_Z"))?;

    let mut parser = Parser::new(encoding);
    match parser.peek()? {
        b'T' | b'G' => special_name(parser.peek_at(1)),
        b'N' => parser.nested_name(out),
        // Unqualified names: free functions, data, std:: abbreviations,
        // internal-linkage names, operators.
        b'S' | b'L' => Some(SymbolKind::Ignorable),
        b if b.is_ascii_digit() => Some(SymbolKind::Ignorable),
        b if b.is_ascii_lowercase() => Some(SymbolKind::Ignorable),
        _ => None,
    }
}

/// `_ZT*` / `_ZG*` special names: vtables, VTTs, typeinfo, thunks, guard
/// variables. Recognised but featureless.
fn special_name(second: Option<u8>) -> Option<SymbolKind> {
    match second {
        Some(b'V' | b'T' | b'I' | b'S' | b'h' | b'v' | b'c' | b'C' | b'W' | b'H' | b'R' | b'A') => {
            Some(SymbolKind::Other)
        }
        _ => None,
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        (self.bump()? == byte).then_some(())
    }

    /// `N …qualifiers… prefix+ structor-or-name E`
    fn nested_name(&mut self, out: &mut SymbolFeatures) -> Option<SymbolKind> {
        self.expect(b'N')?;
        while matches!(self.peek()?, b'r' | b'V' | b'K') {
            self.pos += 1;
        }
        if matches!(self.peek()?, b'R' | b'O') {
            self.pos += 1;
        }

        let mut names: Vec<String> = Vec::new();
        loop {
            match self.peek()? {
                b'E' => {
                    // Terminal component was a plain name: a member
                    // function or static member, not a structor.
                    return Some(SymbolKind::Ignorable);
                }
                b'C' => {
                    let variant = self.structor_variant(b'C')?;
                    return self.finish_structor(out, names, SymbolKind::Ctor, variant);
                }
                b'D' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                    let variant = self.structor_variant(b'D')?;
                    return self.finish_structor(out, names, SymbolKind::Dtor, variant);
                }
                b'I' => {
                    // Template arguments of the previous component; the
                    // scope name elides them.
                    self.skip_template_args()?;
                }
                b'L' => {
                    // Internal-linkage marker before a member name.
                    self.pos += 1;
                }
                b'S' => {
                    self.std_component(&mut names)?;
                }
                b if b.is_ascii_digit() => {
                    let name = self.source_name()?;
                    if name.starts_with(ANON_NAMESPACE) {
                        names.push(ANON_SCOPE.to_string());
                    } else {
                        names.push(name.to_string());
                    }
                }
                b if b.is_ascii_lowercase() => {
                    // A two-letter operator code can only be terminal.
                    self.pos += 2;
                    self.expect(b'E')?;
                    return Some(SymbolKind::Ignorable);
                }
                _ => return None,
            }
        }
    }

    /// `C1`/`C2`/… or `D0`/`D1`/…, returning the variant digit. The
    /// marker must be terminal.
    fn structor_variant(&mut self, lead: u8) -> Option<u8> {
        self.expect(lead)?;
        let digit = self.bump()?;
        let variant = match (lead, digit) {
            (b'C', b'1'..=b'5') | (b'D', b'0'..=b'2' | b'4' | b'5') => digit - b'0',
            // CI1/CI2 inheriting constructors are out of the subset.
            _ => return None,
        };
        self.expect(b'E')?;
        Some(variant)
    }

    fn finish_structor(
        &mut self,
        out: &mut SymbolFeatures,
        names: Vec<String>,
        kind: SymbolKind,
        variant: u8,
    ) -> Option<SymbolKind> {
        let base = names.last()?.clone();
        if base == ANON_SCOPE {
            return None;
        }
        out.scope_names = names;
        out.scope_names.push(base.clone());
        out.base_name = base;
        out.variant = variant;
        Some(kind)
    }

    /// `St` and the `Sa`/`Sb`/`Ss`/`Si`/`So`/`Sd` abbreviations. Numeric
    /// substitution references cannot be resolved from the name alone and
    /// fail the parse.
    fn std_component(&mut self, names: &mut Vec<String>) -> Option<()> {
        self.expect(b'S')?;
        let class = match self.bump()? {
            b't' => {
                names.push("std".to_string());
                return Some(());
            }
            b'a' => "allocator",
            b'b' => "basic_string",
            b's' => "string",
            b'i' => "istream",
            b'o' => "ostream",
            b'd' => "iostream",
            _ => return None,
        };
        names.push("std".to_string());
        names.push(class.to_string());
        Some(())
    }

    /// `<decimal length><bytes>`
    fn source_name(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self.peek()?.is_ascii_digit() {
            self.pos += 1;
        }
        let len: usize = std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()?;
        if len == 0 || self.pos + len > self.bytes.len() {
            return None;
        }
        let name = std::str::from_utf8(&self.bytes[self.pos..self.pos + len]).ok()?;
        self.pos += len;
        Some(name)
    }

    /// Skip a balanced `I…E` template-argument list. Source names are
    /// skipped atomically; integer literals (`Li5E`) are skipped raw.
    fn skip_template_args(&mut self) -> Option<()> {
        self.expect(b'I')?;
        let mut depth = 1usize;
        while depth > 0 {
            let b = self.peek()?;
            if b.is_ascii_digit() {
                self.source_name()?;
                continue;
            }
            match b {
                b'E' => {
                    depth -= 1;
                    self.pos += 1;
                }
                b'I' | b'X' | b'N' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'L' => {
                    self.pos += 1;
                    while self.peek()? != b'E' {
                        self.pos += 1;
                    }
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Some(())
    }
}
