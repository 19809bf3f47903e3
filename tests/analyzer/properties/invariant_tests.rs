//! Generated-Input Invariants
//!
//! Property tests over generated sources: scanning covers every character,
//! analysis is a pure function of its input, well-formed nesting always
//! unwinds to the global scope, and the first declaration of a name decides
//! the kind of every later reference.

use std::collections::HashMap;

use crate::analyzer::analyze_text;
use fpp_rs::core::analyzer::{Analyzer, AnalyzerOptions, GLOBAL_SCOPE};
use fpp_rs::core::scanner::{Modifiers, TokenKind, scan};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "module", "constant", "enum", "struct", "array", "port", "type", "active",
    "passive", "component", "instance", "topology", "connections", "command",
    "sync", "async", "input", "output", "param", "event", "telemetry", "phase",
    "default", "base", "id", "a", "b", "Color", "M", "$module", "0", "1", "2.5",
    "-", "+", "{", "}", "(", ")", "[", "]", "=", ":", ",", "->", ".", "\"s\"",
    "\"\"\"", "U8", "string", "size", "# note", "@ doc",
];

const SEPARATORS: &[&str] = &[" ", " ", "\n"];

const NAMES: &[&str] = &["alpha", "beta", "gamma", "delta"];

fn arb_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(NAMES)
}

/// A document of arbitrary, mostly malformed fragments.
fn arb_fragments() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (prop::sample::select(FRAGMENTS), prop::sample::select(SEPARATORS)),
        0..40,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(fragment, separator)| format!("{fragment}{separator}"))
            .collect()
    })
}

/// A syntactically well-formed definition, possibly nested in modules.
fn arb_definition() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        arb_name().prop_map(|n| format!("constant {n} = 1")),
        arb_name().prop_map(|n| format!("enum {n} {{ v1, v2 = 3 }}")),
        arb_name().prop_map(|n| format!("struct {n} {{ f: U8, g: [2] F32 }}")),
        arb_name().prop_map(|n| format!("array {n} = [2] U16 default 0")),
        arb_name().prop_map(|n| format!("port {n}(p: U32) -> bool")),
        arb_name().prop_map(|n| format!("passive component {n} {{ sync command Go(x: U8) }}")),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (arb_name(), prop::collection::vec(inner, 0..4))
            .prop_map(|(n, body)| format!("module {n} {{\n{}\n}}", body.join("\n")))
    })
}

/// Declarations and references of a small pool of names, in any order.
fn arb_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_name().prop_map(|n| format!("constant {n} = 1")),
        arb_name().prop_map(|n| format!("enum {n} {{ e1 }}")),
        arb_name().prop_map(|n| format!("struct {n} {{ f: U8 }}")),
        arb_name().prop_map(|n| format!("module {n} {{ }}")),
        arb_name().prop_map(|n| format!("type {n}")),
        arb_name().prop_map(|n| format!("port {n}")),
        arb_name().prop_map(|n| format!("constant total = {n} + 1")),
        arb_name().prop_map(|n| format!("array holder = [1] {n}")),
    ]
}

/// Scan `lines` as one document and lay every token back onto the line it
/// was read from, including each piece of a multi-line `"""` string.
fn rebuild_lines(lines: &[String]) -> Result<Vec<String>, String> {
    let tokens = scan(&lines.join("\n"));
    let mut rebuilt = Vec::with_capacity(lines.len());
    for (row, line) in lines.iter().enumerate() {
        let mut bytes = vec![b' '; line.len()];
        let mut end = 0;
        for token in tokens.iter().filter(|t| t.line() as usize == row) {
            let start = token.start_column() as usize;
            if start < end {
                return Err(format!("overlapping token {token:?}"));
            }
            end = start + token.length() as usize;
            if end > line.len() {
                return Err(format!("token {token:?} runs past line {row}"));
            }
            bytes[start..end].copy_from_slice(token.text().as_bytes());
        }
        rebuilt.push(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(rebuilt)
}

/// Printable lines, with a quote-heavy alphabet mixed in so `"` strings and
/// `"""` blocks spanning lines turn up often.
fn arb_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof!["[ -~]{0,30}", "[ \"ab#]{0,12}"], 0..6)
}

#[test]
fn block_string_pieces_rebuild_their_lines() {
    let lines: Vec<String> = [
        "constant s = \"\"\"open",
        "",
        "  middle \" # not a comment",
        "end\"\"\" + \"x\\\"y\" # tail",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    assert_eq!(rebuild_lines(&lines), Ok(lines));
}

proptest! {
    /// Every non-space character of a line belongs to exactly one token, in
    /// order, at the column it was read from.
    #[test]
    fn tokens_reconstruct_each_line(lines in arb_lines()) {
        let rebuilt = rebuild_lines(&lines);
        prop_assert!(rebuilt.is_ok(), "{:?}", rebuilt);
        prop_assert_eq!(rebuilt.unwrap_or_default(), lines);
    }

    /// Quotes of any kind still leave no character of a single line uncovered.
    #[test]
    fn quoted_lines_are_fully_covered(line in "[ -~]{0,40}") {
        let tokens = scan(&line);
        let covered: usize = tokens.iter().map(|t| t.length() as usize).sum();
        let visible = line.chars().filter(|c| *c != ' ').count();
        prop_assert!(covered >= visible);
        prop_assert!(tokens.iter().all(|t| t.end_column() as usize <= line.len()));
    }

    #[test]
    fn analysis_is_idempotent(text in arb_fragments()) {
        let analyzer = Analyzer::new(AnalyzerOptions::strict());
        let first = analyzer.analyze_source(&text);
        let second = analyzer.analyze_source(&text);
        prop_assert_eq!(&first, &second);

        let fresh = Analyzer::new(AnalyzerOptions::strict()).analyze_source(&text);
        prop_assert_eq!(first, fresh);
    }

    #[test]
    fn well_formed_nesting_returns_to_global_scope(
        definitions in prop::collection::vec(arb_definition(), 1..5),
    ) {
        let text = format!("{}\nconstant tail = 1", definitions.join("\n"));
        let result = analyze_text(&text);

        prop_assert!(!result.has_errors(), "{:#?}", result.diagnostics);
        prop_assert_eq!(result.scope_resets, 0);
        prop_assert_eq!(
            result.symbol("tail").map(|s| s.scope.as_str()),
            Some(GLOBAL_SCOPE)
        );
    }

    #[test]
    fn first_declaration_decides_reference_kind(
        statements in prop::collection::vec(arb_statement(), 1..12),
    ) {
        let result = analyze_text(&statements.join("\n"));
        prop_assert!(!result.has_errors(), "{:#?}", result.diagnostics);

        let mut declared: HashMap<&str, TokenKind> = HashMap::new();
        for token in result.tokens.iter().filter(|t| NAMES.contains(&t.text())) {
            if token.modifiers().contains(Modifiers::DECLARATION) {
                declared.entry(token.text()).or_insert(token.kind());
                continue;
            }
            let expected = declared.get(token.text()).copied().unwrap_or(TokenKind::Nil);
            prop_assert_eq!(token.kind(), expected, "reference {:?}", token);
        }
    }
}
