//! Analyzer Configuration and Options Tests
//!
//! Tests that validate the reporting policies for unknown identifiers and
//! duplicate declarations, the diagnostic limit, and loading options from
//! JSON.

use crate::analyzer::{analyze_text, analyze_text_with_options, codes};
use fpp_rs::core::analyzer::{AnalyzerOptions, DiagnosticCode, ReportLevel, Severity};
use pretty_assertions::assert_eq;

#[test]
fn unknown_identifiers_are_silent_by_default() {
    let result = analyze_text("constant a = b + c.d");

    assert!(result.diagnostics.is_empty());
}

#[test]
fn unknown_identifier_warning_with_suggestion() {
    let options = AnalyzerOptions::new().with_unknown_identifiers(ReportLevel::Warning);
    let result = analyze_text_with_options("constant alpha = 1\nconstant b = alpah", &options);

    assert_eq!(codes(&result), [DiagnosticCode::UnknownIdentifier]);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.message, "Unknown identifier: alpah");
    assert_eq!(diagnostic.suggestion.as_deref(), Some("did you mean `alpha`?"));
    assert!(!result.has_errors());
}

#[test]
fn references_only_see_earlier_declarations() {
    let result = analyze_text_with_options(
        "constant a = b\nconstant b = 1\nconstant c = b",
        &AnalyzerOptions::strict(),
    );

    assert_eq!(codes(&result), [DiagnosticCode::UnknownIdentifier]);
    assert_eq!(result.diagnostics[0].position(), (0, 13));
    assert!(result.has_errors());
}

#[test]
fn duplicate_declarations_follow_policy() {
    let input = "constant a = 1\nconstant a = 2";

    let warned = analyze_text(input);
    assert_eq!(codes(&warned), [DiagnosticCode::DuplicateDeclaration]);
    assert_eq!(warned.diagnostics[0].severity, Severity::Warning);
    assert_eq!(
        warned.diagnostics[0].message,
        "Duplicate declaration: `a` is already declared in `<global>` as Variable"
    );
    assert_eq!(warned.diagnostics[0].position(), (1, 9));
    // the first declaration is kept
    assert_eq!(warned.symbol("a").map(|s| s.line), Some(0));

    let silent = analyze_text_with_options(
        input,
        &AnalyzerOptions::new().with_duplicate_declarations(ReportLevel::Off),
    );
    assert!(silent.diagnostics.is_empty());

    let strict = analyze_text_with_options(input, &AnalyzerOptions::strict());
    assert_eq!(strict.diagnostics[0].severity, Severity::Error);
}

#[test]
fn same_name_in_sibling_scopes_is_not_a_duplicate() {
    let result = analyze_text_with_options(
        "module A { constant x = 1 }\nmodule B { constant x = 2 }",
        &AnalyzerOptions::strict(),
    );

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.symbol("x").map(|s| s.scope.as_str()), Some("A"));
}

#[test]
fn duplicate_in_a_later_scope_is_reported() {
    let result = analyze_text_with_options(
        "enum E { a }\nstruct S { a: U8, a: U16 }",
        &AnalyzerOptions::strict(),
    );

    assert_eq!(codes(&result), [DiagnosticCode::DuplicateDeclaration]);
    assert_eq!(
        result.diagnostics[0].message,
        "Duplicate declaration: `a` is already declared in `S` as Variable"
    );
    assert_eq!(result.diagnostics[0].position(), (1, 18));
    // references still resolve to the first declaration
    assert_eq!(result.symbol("a").map(|s| s.scope.as_str()), Some("E"));
}

#[test]
fn reopening_a_module_is_allowed() {
    let result = analyze_text_with_options(
        "module M { constant a = 1 }\nmodule M { constant b = a }",
        &AnalyzerOptions::strict(),
    );

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.symbol("b").map(|s| s.scope.as_str()), Some("M"));
}

#[test]
fn diagnostic_limit_truncates_in_position_order() {
    let options = AnalyzerOptions::new().with_max_diagnostics(3);
    let result = analyze_text_with_options("; ; ; ; ;", &options);

    assert_eq!(result.diagnostics.len(), 3);
    let columns: Vec<u32> = result.diagnostics.iter().map(|d| d.token.start_column()).collect();
    assert_eq!(columns, [0, 2, 4]);
}

#[test]
fn options_load_from_json() {
    let options: AnalyzerOptions = serde_json::from_str(
        r#"{ "unknown_identifiers": "warning", "max_diagnostics": 5 }"#,
    )
    .expect("valid options");

    assert_eq!(options.unknown_identifiers, ReportLevel::Warning);
    assert_eq!(options.duplicate_declarations, ReportLevel::Warning);
    assert_eq!(options.max_diagnostics, 5);

    let result = analyze_text_with_options("constant a = b", &options);
    assert_eq!(codes(&result), [DiagnosticCode::UnknownIdentifier]);
}

#[test]
fn unknown_report_level_is_rejected() {
    let parsed = serde_json::from_str::<AnalyzerOptions>(r#"{ "unknown_identifiers": "loud" }"#);

    assert!(parsed.is_err());
}
