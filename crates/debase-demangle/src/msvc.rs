//! Microsoft-ABI symbol classification.
//!
//! Parses the qualified-name component list of a `?`-prefixed symbol. The
//! `?0`/`?1` structor codes select constructor/destructor; other `??`
//! special names (operators, vftables, the scalar/vector deleting
//! destructor helpers) are `Other`, and plain named members are
//! `Ignorable`. Template components are outside the subset and classify
//! as `Invalid`.

use debase_common::{Demangler, SymbolFeatures, SymbolKind};

use crate::itanium::ANON_SCOPE;

pub struct MicrosoftDemangler;

impl Demangler for MicrosoftDemangler {
    fn classify(&self, mangled: &str, out: &mut SymbolFeatures) -> SymbolKind {
        out.clear();
        let kind = parse(mangled, out).unwrap_or(SymbolKind::Invalid);
        if !kind.is_structor() {
            out.scope_names.clear();
            out.base_name.clear();
            out.variant = 0;
        }
        out.kind = kind;
        kind
    }
}

fn parse(mangled: &str, out: &mut SymbolFeatures) -> Option<SymbolKind> {
    let rest = mangled.strip_prefix('?')?;

    if let Some(special) = rest.strip_prefix('?') {
        let code = special.chars().next()?;
        return match code {
            '0' => structor(&special[1..], SymbolKind::Ctor, out),
            '1' => structor(&special[1..], SymbolKind::Dtor, out),
            // Operators, vftables/vbtables, and the `??_G`/`??_E` deleting
            // destructor helpers: recognised, featureless.
            '2'..='9' | '_' | 'A'..='Z' => Some(SymbolKind::Other),
            _ => None,
        };
    }

    // `?name@scopes@@…`: a plain named member or free function. The
    // components still have to parse for the symbol to count as valid.
    component_list(rest)?;
    Some(SymbolKind::Ignorable)
}

/// `??0`/`??1` followed by the class's qualified name.
fn structor(rest: &str, kind: SymbolKind, out: &mut SymbolFeatures) -> Option<SymbolKind> {
    let (class, mut qualifiers) = component_list(rest)?;
    if class == ANON_SCOPE {
        return None;
    }

    // Components are mangled inner-to-outer; scope names read outer-first.
    qualifiers.reverse();
    out.scope_names = qualifiers;
    out.scope_names.push(class.clone());
    out.scope_names.push(class.clone());
    out.base_name = class;
    // The Microsoft ABI has no structor variants; 1 keeps the symbol
    // admissible to matching.
    out.variant = 1;
    Some(kind)
}

/// Parse `name@name@…@@`, returning the terminal (innermost) component
/// and the remaining qualifiers inner-to-outer.
fn component_list(text: &str) -> Option<(String, Vec<String>)> {
    let mut components: Vec<String> = Vec::new();
    let mut rest = text;
    loop {
        if let Some(after) = rest.strip_prefix('@') {
            // Empty component: the `@@` list terminator.
            let _ = after;
            break;
        }
        let (component, after) = component(rest)?;
        components.push(component);
        rest = after;
    }
    if components.is_empty() {
        return None;
    }
    let terminal = components.remove(0);
    Some((terminal, components))
}

/// One `@`-terminated component.
fn component(text: &str) -> Option<(String, &str)> {
    if text.starts_with("?$") {
        // Template component: outside the subset.
        return None;
    }
    if let Some(anon) = text.strip_prefix("?A") {
        // Anonymous namespace, e.g. `?A0x1b4d3b7a@`.
        let end = anon.find('@')?;
        return Some((ANON_SCOPE.to_string(), &anon[end + 1..]));
    }
    if text.starts_with('?') {
        return None;
    }
    let end = text.find('@')?;
    if end == 0 {
        return None;
    }
    let name = &text[..end];
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
    {
        return None;
    }
    Some((name.to_string(), &text[end + 1..]))
}
