//! Grammar-driven analysis of a scanned document.
//!
//! The analyzer walks the token array once, validating every statement against
//! the grammar, registering declarations in a document-wide symbol table,
//! tracking nested scopes and rewriting identifier tokens with their semantic
//! kind. Malformed statements produce diagnostics and are recovered locally;
//! they never stop analysis of the rest of the document.
//!
//! All state is created fresh for each call, so an `Analyzer` can be shared
//! freely between threads and repeated calls on the same input give identical
//! results.
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::analyzer::{Analyzer, AnalyzerOptions};
//! # use fpp_rs::core::scanner::{scan, TokenKind};
//! let analyzer = Analyzer::new(AnalyzerOptions::default());
//! let result = analyzer.analyze(scan("enum Color { red, green }"));
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(result.kind_of("Color"), Some(TokenKind::Enum));
//! assert_eq!(result.kind_of("green"), Some(TokenKind::EnumMember));
//! assert_eq!(result.peak_scope_depth, 2);
//! ```

pub mod config;
pub mod context;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod scope;
pub mod symbol_table;
mod visitor;

pub use config::{AnalyzerOptions, ReportLevel};
pub use context::{AnalysisContext, AnalysisResult};
pub use cursor::TokenCursor;
pub use diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticCollector, DiagnosticSink, Severity,
    did_you_mean, render, suggest,
};
pub use error::{AnalysisError, CancellationFlag};
pub use scope::{GLOBAL_SCOPE, Scope, ScopeStack};
pub use symbol_table::{Symbol, SymbolError, SymbolTable};

use tracing::{debug, info_span};

use crate::core::scanner::{Lexer, ScanResult, Token};
use visitor::GrammarVisitor;

/// Entry point for analyzing scanned documents under one set of options.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    #[must_use]
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze `tokens`, returning the classified stream and diagnostics in
    /// report order.
    #[must_use]
    pub fn analyze(&self, tokens: Vec<Token>) -> AnalysisResult {
        let mut sink = DiagnosticCollector::with_limit(self.options.max_diagnostics);
        let mut result = self.analyze_into(tokens, &mut sink, None);
        result.diagnostics = sink.into_diagnostics();
        result
    }

    /// Like [`Analyzer::analyze`], but checks `cancel` before every top-level
    /// statement.
    ///
    /// # Errors
    /// `AnalysisError::Cancelled` when the flag was raised before the walk
    /// finished. Partial results are discarded.
    pub fn analyze_with_cancellation(
        &self,
        tokens: Vec<Token>,
        cancel: &CancellationFlag,
    ) -> Result<AnalysisResult, AnalysisError> {
        let mut sink = DiagnosticCollector::with_limit(self.options.max_diagnostics);
        let mut visitor = GrammarVisitor::new(tokens, &self.options, &mut sink);
        if !visitor.walk(Some(cancel)) {
            return Err(AnalysisError::Cancelled);
        }
        let mut result = visitor.finish();
        result.diagnostics = sink.into_diagnostics();
        Ok(result)
    }

    /// Analyze `tokens`, reporting every diagnostic to `sink` as it is found.
    /// The returned result carries no diagnostics of its own.
    pub fn analyze_into(
        &self,
        tokens: Vec<Token>,
        sink: &mut dyn DiagnosticSink,
        cancel: Option<&CancellationFlag>,
    ) -> AnalysisResult {
        let span = info_span!("analyze", tokens = tokens.len());
        let _entered = span.enter();

        let mut visitor = GrammarVisitor::new(tokens, &self.options, sink);
        let completed = visitor.walk(cancel);
        let result = visitor.finish();
        debug!(
            completed,
            symbols = result.symbols.len(),
            classified = result.classified.len(),
            peak_scope_depth = result.peak_scope_depth,
            "analysis finished"
        );
        result
    }

    /// Scan and analyze `text`. Lexical and grammar diagnostics are merged
    /// and ordered by position.
    #[must_use]
    pub fn analyze_source(&self, text: &str) -> AnalysisResult {
        let ScanResult { tokens, errors } = Lexer::tokenize(text);
        let mut sink = DiagnosticCollector::with_limit(self.options.max_diagnostics);
        for error in errors {
            sink.report(error.into());
        }

        let mut result = self.analyze_into(tokens, &mut sink, None);
        if sink.dropped() > 0 {
            debug!(dropped = sink.dropped(), "diagnostic limit reached");
        }
        let mut diagnostics = sink.into_diagnostics();
        diagnostics.sort_by_key(Diagnostic::position);
        result.diagnostics = diagnostics;
        result
    }
}

/// Analyze `tokens` with default options.
#[must_use]
pub fn analyze(tokens: Vec<Token>) -> AnalysisResult {
    Analyzer::default().analyze(tokens)
}

/// Scan and analyze `text` with `options`.
#[must_use]
pub fn analyze_source(text: &str, options: &AnalyzerOptions) -> AnalysisResult {
    Analyzer::new(options.clone()).analyze_source(text)
}
