use super::*;

fn one(pattern: &str) -> PatternToken {
    let tokens = lex(pattern, None).unwrap();
    assert_eq!(tokens.len(), 1, "expected one token for {pattern}");
    tokens.into_iter().next().unwrap()
}

// --- regex segments ---

#[test]
fn quantified_identifier_is_a_regex_token() {
    let tok = one("y+");
    assert_eq!(tok.kind, TokenKind::Regex);
    assert_eq!(tok.text, "y+");
    assert_eq!(tok.trailing, 0);
    assert!(!tok.modified);
}

#[test]
fn slash_surround_is_stripped() {
    let tok = one("/y+/");
    assert_eq!(tok.kind, TokenKind::Regex);
    assert_eq!(tok.text, "y+");
    assert!(tok.modified);
}

#[test]
fn slash_stripped_identifier_collapses_to_simple() {
    let tok = one("/abc/");
    assert_eq!(tok.kind, TokenKind::Simple);
    assert_eq!(tok.text, "abc");
    assert!(tok.modified);
}

#[test]
fn wildcard_expands_to_identifier_class() {
    let tok = one("a.b");
    assert_eq!(tok.kind, TokenKind::Regex);
    assert_eq!(tok.text, "a[A-Za-z0-9_$]b");
    assert!(tok.modified);
}

#[test]
fn character_class_is_copied_verbatim() {
    let tok = one("[A-Z]x");
    assert_eq!(tok.kind, TokenKind::Regex);
    assert_eq!(tok.text, "[A-Z]x");
}

#[test]
fn posix_class_segment() {
    let tok = one("[[:lower:]]+");
    assert_eq!(tok.kind, TokenKind::Regex);
    assert_eq!(tok.text, "[[:lower:]]+");
}

#[test]
fn escapes_expand_to_classes() {
    assert_eq!(one("x\\d").text, "x[0-9]");
    assert_eq!(one("x\\a").text, "x[A-Za-z]");
    assert_eq!(one("x\\w").text, "x[A-Za-z0-9_]");
    assert_eq!(one("x\\i").text, "x[A-Za-z0-9_$]");
}

#[test]
fn escaped_class_is_quantifiable() {
    assert_eq!(one("x\\d+").text, "x[0-9]+");
}

#[test]
fn lazy_quantifiers_are_legal() {
    assert_eq!(one("ab*?").text, "ab*?");
    assert_eq!(one("ab+?").text, "ab+?");
}

// --- quantifier misuse ---

#[test]
fn double_question_fails() {
    assert!(matches!(
        lex("ab??", None).unwrap_err(),
        PatternError::QuantifierMisuse { .. }
    ));
}

#[test]
fn double_plus_fails() {
    assert!(matches!(
        lex("ab++", None).unwrap_err(),
        PatternError::QuantifierMisuse { .. }
    ));
}

#[test]
fn glob_inside_compound_fails() {
    // `I**` reads as identifier, star, star: a glob in the wrong place.
    let err = lex("I**", None).unwrap_err();
    assert!(matches!(err, PatternError::QuantifierMisuse { .. }));
    assert!(err.to_string().contains("glob"));
}

#[test]
fn quantifier_at_segment_start_fails() {
    for pattern in ["?x", "+x", "a::?x"] {
        assert!(
            matches!(
                lex(pattern, None).unwrap_err(),
                PatternError::QuantifierMisuse { .. }
            ),
            "pattern: {pattern}"
        );
    }
}

#[test]
fn quantifier_after_quantifier_fails() {
    assert!(matches!(
        lex("a*+", None).unwrap_err(),
        PatternError::QuantifierMisuse { .. }
    ));
    assert!(matches!(
        lex("a?*", None).unwrap_err(),
        PatternError::QuantifierMisuse { .. }
    ));
}

// --- escapes ---

#[test]
fn whitespace_escapes_fail() {
    for pattern in ["a\\n", "a\\r", "a\\t", "a\\0"] {
        let err = lex(pattern, None).unwrap_err();
        assert!(
            matches!(err, PatternError::InvalidEscape { .. }),
            "pattern: {pattern}"
        );
    }
}

#[test]
fn unknown_escape_fails() {
    let err = lex("a\\q", None).unwrap_err();
    assert!(matches!(err, PatternError::InvalidEscape { .. }));
    assert!(err.to_string().contains("\\q"));
}

#[test]
fn dangling_backslash_fails() {
    assert!(matches!(
        lex("a\\", None).unwrap_err(),
        PatternError::InvalidEscape { .. }
    ));
}

// --- groups and stray bytes ---

#[test]
fn capture_groups_are_unsupported() {
    let err = lex("a(b)", None).unwrap_err();
    assert!(matches!(err, PatternError::UnsupportedFeature { .. }));
    assert!(err.to_string().contains("group"));
}

#[test]
fn stray_close_bracket_fails() {
    assert!(matches!(
        lex("ab]", None).unwrap_err(),
        PatternError::InvalidCharClass { .. }
    ));
}

#[test]
fn dash_outside_class_fails() {
    assert!(matches!(
        lex("a-b", None).unwrap_err(),
        PatternError::InvalidCharClass { .. }
    ));
}

#[test]
fn caret_outside_class_fails() {
    assert!(matches!(
        lex("a^b", None).unwrap_err(),
        PatternError::InvalidCharClass { .. }
    ));
}

#[test]
fn interior_whitespace_fails() {
    assert!(matches!(
        lex("a b::c", None).unwrap_err(),
        PatternError::BadScope { .. }
    ));
}

#[test]
fn anonymous_marker_inside_compound_fails() {
    assert!(matches!(
        lex("x@y", None).unwrap_err(),
        PatternError::UnsupportedFeature { .. }
    ));
}

#[test]
fn invalid_class_inside_compound_fails() {
    assert!(matches!(
        lex("x[0-z]", None).unwrap_err(),
        PatternError::InvalidCharClass { .. }
    ));
    assert!(matches!(
        lex("[0-z]", None).unwrap_err(),
        PatternError::InvalidCharClass { .. }
    ));
}

// --- replacements inside compounds ---

#[test]
fn regex_with_replacement_is_regex_fmt() {
    let tokens = lex("I?{file.stem}", None).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::RegexFmt);
    assert_eq!(tokens[0].text, "I?{0}");
    assert_eq!(tokens[0].trailing, 1);
    assert!(tokens[0].grouped);
    assert_eq!(tokens[1].kind, TokenKind::LateBind);
    assert_eq!(tokens[1].text, "file.stem");
    assert!(!tokens[1].grouped);
}

#[test]
fn literal_with_replacement_is_simple_fmt() {
    let tokens = lex("{file.stem}Impl", None).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::SimpleFmt);
    assert_eq!(tokens[0].text, "{0}Impl");
    assert_eq!(tokens[0].trailing, 1);
}

#[test]
fn repeated_replacement_bodies_are_deduplicated() {
    let tokens = lex("{file.stem}_{file.stem}", None).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].text, "{0}_{0}");
    assert_eq!(tokens[0].trailing, 1);
}

#[test]
fn distinct_replacement_bodies_index_in_order() {
    let tokens = lex("{file.stem}_{file.ext}_{file.stem}", None).unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].text, "{0}_{1}_{0}");
    assert_eq!(tokens[0].trailing, 2);
    assert_eq!(tokens[1].text, "file.stem");
    assert!(tokens[1].grouped);
    assert_eq!(tokens[2].text, "file.ext");
    assert!(!tokens[2].grouped);
}

#[test]
fn replacement_followed_by_quantifier_is_legal() {
    let tokens = lex("{file.stem}+", None).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::RegexFmt);
    assert_eq!(tokens[0].text, "{0}+");
}

#[test]
fn this_inside_compound_resolves_now() {
    let props = FileProps::new("bindings/CCScheduler.cpp");
    let tokens = lex("I?{this.stem}", Some(&props)).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Regex);
    assert_eq!(tokens[0].text, "I?(CCScheduler)");
}

#[test]
fn this_inside_compound_collapses_to_simple_without_regex() {
    let props = FileProps::new("bindings/CCScheduler.cpp");
    let tokens = lex("I{this.stem}", Some(&props)).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Simple);
    assert_eq!(tokens[0].text, "ICCScheduler");
    assert!(tokens[0].modified);
}

#[test]
fn this_inside_compound_without_cache_fails() {
    assert!(matches!(
        lex("I?{this.stem}", None).unwrap_err(),
        PatternError::FileProperty { .. }
    ));
}

#[test]
fn this_resolution_value_must_be_identifier() {
    let props = FileProps::new("a/b/CCScheduler.cpp");
    assert!(matches!(
        lex("I?{this.dir}", Some(&props)).unwrap_err(),
        PatternError::BadIdentifier { .. }
    ));
}

#[test]
fn unknown_object_inside_compound_fails() {
    assert!(matches!(
        lex("I?{xyz.stem}", None).unwrap_err(),
        PatternError::UnknownReplacementObject { .. }
    ));
}

#[test]
fn unterminated_replacement_fails() {
    assert!(matches!(
        lex("I?{file.stem", None).unwrap_err(),
        PatternError::BadScope { .. }
    ));
}

#[test]
fn nested_replacement_fails() {
    assert!(matches!(
        lex("a{fi{le}.stem}", None).unwrap_err(),
        PatternError::BadScope { .. }
    ));
}

// --- whole-pattern shapes ---

#[test]
fn full_chain_with_regex_and_replacement() {
    let tokens = lex("x::/y+/::z::I?{file.stem}", None).unwrap();
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Simple,
            TokenKind::Regex,
            TokenKind::Simple,
            TokenKind::RegexFmt,
            TokenKind::LateBind,
        ]
    );
}
