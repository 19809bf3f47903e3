//! Canonical Analysis Scenarios
//!
//! Small documents whose classification, scoping and diagnostics are fully
//! determined, checked token by token.

use crate::analyzer::{analyze_text, assert_clean, classification, codes};
use fpp_rs::core::analyzer::{DiagnosticCode, GLOBAL_SCOPE, Severity};
use fpp_rs::core::scanner::{Lexer, Modifiers, TokenKind};
use pretty_assertions::assert_eq;

#[test]
fn constant_definition() {
    let result = analyze_text("constant a = 1");

    assert_clean(&result);
    assert_eq!(
        classification(&result),
        [
            ("constant", TokenKind::Keyword, Modifiers::empty()),
            ("a", TokenKind::Variable, Modifiers::DECLARATION),
            ("=", TokenKind::Operator, Modifiers::empty()),
            ("1", TokenKind::Number, Modifiers::empty()),
        ]
    );
}

#[test]
fn enum_members_inside_enum_scope() {
    let result = analyze_text("enum Color { red, green, blue }");

    assert_clean(&result);
    assert_eq!(result.kind_of("Color"), Some(TokenKind::Enum));
    for member in ["red", "green", "blue"] {
        assert_eq!(result.kind_of(member), Some(TokenKind::EnumMember), "{member}");
        let symbol = result.symbol(member).expect("member declared");
        assert_eq!(symbol.scope, "Color");
        assert_eq!(symbol.modifiers, Modifiers::READONLY);
    }
    assert_eq!(
        result.symbol("Color").map(|s| s.scope.as_str()),
        Some(GLOBAL_SCOPE)
    );
    assert_eq!(result.peak_scope_depth, 2);
}

#[test]
fn missing_expression_is_reported_after_equals() {
    let result = analyze_text("constant a = \nconstant b = 2\narray c = [2] U8");

    assert_eq!(codes(&result), [DiagnosticCode::ExpectedToken]);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.message, "Expected expression, found `constant`");
    assert_eq!(diagnostic.position(), (0, 12));
    assert_eq!(diagnostic.token.length(), 0);

    // the following statements are analyzed normally
    assert_eq!(result.kind_of("b"), Some(TokenKind::Variable));
    assert_eq!(result.kind_of("c"), Some(TokenKind::Variable));
    assert_eq!(result.kind_of("U8"), Some(TokenKind::Type));
}

#[test]
fn missing_expression_at_end_of_document() {
    let result = analyze_text("constant a = ");

    assert_eq!(codes(&result), [DiagnosticCode::UnexpectedEndOfInput]);
    assert_eq!(
        result.diagnostics[0].message,
        "Expected expression, found end of input"
    );
    assert_eq!(result.diagnostics[0].position(), (0, 12));
    assert_eq!(result.symbol("a").map(|s| s.kind), Some(TokenKind::Variable));
}

#[test]
fn array_with_size_type_and_default() {
    let result = analyze_text("array Foo = [3] U32 default 0");

    assert_clean(&result);
    assert_eq!(
        classification(&result),
        [
            ("array", TokenKind::Keyword, Modifiers::empty()),
            ("Foo", TokenKind::Variable, Modifiers::DECLARATION),
            ("=", TokenKind::Operator, Modifiers::empty()),
            ("[", TokenKind::Operator, Modifiers::empty()),
            ("3", TokenKind::Number, Modifiers::empty()),
            ("]", TokenKind::Operator, Modifiers::empty()),
            ("U32", TokenKind::Type, Modifiers::empty()),
            ("default", TokenKind::Keyword, Modifiers::empty()),
            ("0", TokenKind::Number, Modifiers::empty()),
        ]
    );
}

#[test]
fn triple_quoted_string_spans_lines() {
    let input = "constant doc = \"\"\"first\n  second\nthird\"\"\"\nconstant after = 1";
    let scanned = Lexer::tokenize(input);
    let strings: Vec<(u32, &str)> = scanned
        .tokens
        .iter()
        .filter(|t| t.kind() == TokenKind::String)
        .map(|t| (t.line(), t.text()))
        .collect();
    assert_eq!(
        strings,
        [(0, "\"\"\"first"), (1, "  second"), (2, "third\"\"\"")]
    );
    assert!(scanned.errors.is_empty());

    let result = analyze_text(input);
    assert_clean(&result);
    assert_eq!(result.kind_of("after"), Some(TokenKind::Variable));
}

#[test]
fn nested_module_and_component_scopes() {
    let result = analyze_text("module M { active component C { } }");

    assert_clean(&result);
    assert_eq!(result.peak_scope_depth, 3);
    assert_eq!(result.kind_of("M"), Some(TokenKind::Namespace));
    assert_eq!(result.kind_of("C"), Some(TokenKind::Component));
    assert_eq!(result.symbol("C").map(|s| s.scope.as_str()), Some("M"));

    // a trailing statement lands back in the global scope
    let result = analyze_text("module M { active component C { } }\nconstant after = 1");
    assert_eq!(
        result.symbol("after").map(|s| s.scope.as_str()),
        Some(GLOBAL_SCOPE)
    );
}
