//! Symbol-list input.
//!
//! A symbols file carries one mangled name per line. `llvm-nm` output is
//! accepted as-is: the name is the last whitespace-separated column, so
//! address and type columns are skipped. Blank lines and `#` comments are
//! ignored.

/// Extract mangled names from a symbols file body.
pub fn parse_symbol_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next_back())
        .map(ToString::to_string)
        .collect()
}
