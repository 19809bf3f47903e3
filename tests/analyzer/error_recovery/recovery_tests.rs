//! Error Recovery and Diagnostic Quality Tests
//!
//! Malformed documents must produce precise diagnostics, and analysis must
//! resume at the next statement so later declarations are still classified.

use crate::analyzer::{analyze_text, codes};
use fpp_rs::core::analyzer::{DiagnosticCode, GLOBAL_SCOPE, Severity, render};
use fpp_rs::core::scanner::TokenKind;
use pretty_assertions::assert_eq;

#[test]
fn stray_closing_brace_at_top_level() {
    let result = analyze_text("constant a = 1\n}\nconstant b = 2");

    assert_eq!(codes(&result), [DiagnosticCode::UnexpectedToken]);
    assert_eq!(result.diagnostics[0].message, "Unexpected token: }");
    assert_eq!(result.diagnostics[0].position(), (1, 0));
    assert_eq!(result.kind_of("b"), Some(TokenKind::Variable));
}

#[test]
fn misspelled_keyword_gets_a_suggestion() {
    let result = analyze_text("modul M {}");

    let first = &result.diagnostics[0];
    assert_eq!(first.code, DiagnosticCode::UnexpectedToken);
    assert_eq!(first.message, "Unexpected token: modul");
    assert_eq!(first.suggestion.as_deref(), Some("did you mean `module`?"));
}

#[test]
fn reserved_word_used_as_name() {
    let result = analyze_text("constant active = 1");

    assert_eq!(codes(&result), [DiagnosticCode::InvalidIdentifier]);
    assert_eq!(result.diagnostics[0].message, "Invalid identifier: active");
    assert_eq!(
        result.diagnostics[0].suggestion.as_deref(),
        Some("escape the reserved word as `$active`")
    );
    assert!(result.symbols.is_empty());

    let escaped = analyze_text("constant $active = 1");
    assert!(escaped.diagnostics.is_empty());
    assert_eq!(escaped.symbol("active").map(|s| s.kind), Some(TokenKind::Variable));
}

#[test]
fn invalid_type_suggests_builtins() {
    let result = analyze_text("array A = [2] 32");

    assert_eq!(codes(&result), [DiagnosticCode::InvalidType]);
    assert_eq!(result.diagnostics[0].message, "Invalid type: 32");
    assert_eq!(
        result.diagnostics[0].suggestion.as_deref(),
        Some("did you mean one of: `F32`, `I32`, `U32`?")
    );
}

#[test]
fn each_broken_statement_is_reported_once() {
    let result = analyze_text(
        "constant a = \nconstant b = 2\nenum E { x = }\nstruct S { f: }\nconstant c = 3",
    );

    let messages: Vec<&str> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "Expected expression, found `constant`",
            "Expected expression, found `}`",
            "Expected type name, found `}`",
        ]
    );
    assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Error));
    assert!(
        result
            .diagnostics
            .windows(2)
            .all(|pair| pair[0].position() <= pair[1].position())
    );
    assert_eq!(result.scope_resets, 0);
    for name in ["b", "E", "x", "S", "f", "c"] {
        assert!(result.symbol(name).is_some(), "{name} should be declared");
    }
}

#[test]
fn broken_connection_resumes_at_closing_brace() {
    let result = analyze_text("topology T {\n  connections W {\n    a.out -> \n  }\n}\nconstant k = 1");

    assert_eq!(codes(&result), [DiagnosticCode::ExpectedToken]);
    assert_eq!(result.diagnostics[0].message, "Expected identifier, found `}`");
    assert_eq!(result.diagnostics[0].position(), (2, 12));
    assert_eq!(result.scope_resets, 0);
    assert_eq!(result.kind_of("k"), Some(TokenKind::Variable));
}

#[test]
fn member_not_allowed_in_block() {
    let result = analyze_text("module M {\n  sync command Ping\n}\nconstant k = 1");

    assert_eq!(result.diagnostics[0].message, "Unexpected token: sync");
    assert!(result.diagnostics.iter().all(|d| d.code == DiagnosticCode::UnexpectedToken));
    assert_eq!(result.symbol("k").map(|s| s.scope.as_str()), Some(GLOBAL_SCOPE));
}

#[test]
fn unterminated_component_reports_end_of_input() {
    let result = analyze_text("active component C {\n  sync command A\n");

    assert_eq!(codes(&result), [DiagnosticCode::UnexpectedEndOfInput]);
    assert_eq!(result.diagnostics[0].message, "Expected `}`, found end of input");
    assert_eq!(result.diagnostics[0].position(), (1, 16));
    assert_eq!(result.symbol("A").map(|s| s.scope.as_str()), Some("C"));
}

#[test]
fn unterminated_string_does_not_stop_analysis() {
    let result = analyze_text("constant s = \"open\nconstant t = 1");

    assert_eq!(codes(&result), [DiagnosticCode::UnterminatedString]);
    assert_eq!(result.diagnostics[0].message, "unterminated string literal");
    assert_eq!(result.kind_of("t"), Some(TokenKind::Variable));
}

#[test]
fn rendered_diagnostic_points_at_the_token() {
    let source = "constant x = 1\narray A = [2] 32";
    let result = analyze_text(source);

    assert_eq!(
        render(&result.diagnostics[0], source),
        "error[InvalidType]:2:15: Invalid type: 32\n  array A = [2] 32\n                ^^\n  help: did you mean one of: `F32`, `I32`, `U32`?"
    );
}
