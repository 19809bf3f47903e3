//! Concurrent Analysis Determinism Tests
//!
//! Analyses share no state, so running the same document on many threads
//! must give identical results, and a cancellation raised from another
//! thread must stop only the analysis it was handed to.

use std::sync::Arc;
use std::thread;

use crate::analyzer::{analyze_text, assert_concurrent_deterministic, nested_document};
use fpp_rs::core::analyzer::{AnalysisError, Analyzer, AnalyzerOptions, CancellationFlag};
use fpp_rs::core::scanner::{TokenKind, scan};
use pretty_assertions::assert_eq;

#[test]
fn concurrent_empty_document() {
    assert_concurrent_deterministic("", 4);
}

#[test]
fn concurrent_small_model() {
    let input = r"
module M {
  enum Color { red, green, blue } default green
  struct Point { x: F32, y: F32 }
  array Path = [4] Point
}
";
    assert_concurrent_deterministic(input, 8);
}

#[test]
fn concurrent_malformed_document() {
    let input = "constant a = \nenum E { x = }\nmodule M {\n  sync command C\n";
    assert_concurrent_deterministic(input, 6);
}

#[test]
fn shared_analyzer_across_threads() {
    let analyzer = Arc::new(Analyzer::new(AnalyzerOptions::strict()));
    let cases = [
        ("constant a = 1", TokenKind::Variable, 1),
        ("enum E { a }", TokenKind::EnumMember, 2),
        ("module a { }", TokenKind::Namespace, 1),
        ("port a", TokenKind::Port, 1),
    ];

    let handles: Vec<_> = cases
        .iter()
        .map(|(input, _, _)| {
            let analyzer = Arc::clone(&analyzer);
            let input = (*input).to_string();
            thread::spawn(move || analyzer.analyze_source(&input))
        })
        .collect();

    for (handle, (input, kind, symbols)) in handles.into_iter().zip(cases) {
        let result = handle.join().expect("analysis thread panicked");
        assert!(result.diagnostics.is_empty(), "{input}: {:?}", result.diagnostics);
        // no symbol leaks in from the other documents
        assert_eq!(result.symbols.len(), symbols, "{input}");
        assert_eq!(result.symbol("a").map(|s| s.kind), Some(kind), "{input}");
    }
}

#[test]
fn cancellation_from_another_thread() {
    let flag = CancellationFlag::new();
    let remote = flag.clone();
    thread::spawn(move || remote.cancel())
        .join()
        .expect("cancelling thread panicked");

    let analyzer = Analyzer::default();
    assert_eq!(
        analyzer.analyze_with_cancellation(scan("constant a = 1"), &flag),
        Err(AnalysisError::Cancelled)
    );

    // an independent flag is unaffected
    let other = CancellationFlag::new();
    let result = analyzer
        .analyze_with_cancellation(scan("constant a = 1"), &other)
        .expect("not cancelled");
    assert_eq!(result, Analyzer::default().analyze(scan("constant a = 1")));
}

#[test]
#[ignore = "concurrent test - run with: cargo test -- --include-ignored"]
fn concurrent_deeply_nested_document() {
    let input = nested_document(40);
    assert!(analyze_text(&input).diagnostics.is_empty());
    assert_concurrent_deterministic(&input, 16);
}
