//! Call-scoped analysis state and the result handed back to callers.
//!
//! Every analysis call builds a fresh `AnalysisContext`; nothing survives
//! between calls, so concurrent analyses of different documents never share
//! a symbol table, scope stack or output buffer.

use serde::Serialize;

use crate::core::analyzer::diagnostics::{Diagnostic, Severity};
use crate::core::analyzer::scope::ScopeStack;
use crate::core::analyzer::symbol_table::{Symbol, SymbolTable};
use crate::core::scanner::{Token, TokenKind};

/// Mutable state owned by one analysis call.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub symbols: SymbolTable,
    pub scopes: ScopeStack,
    /// Identifier tokens whose semantic kind was resolved, in visit order.
    pub classified: Vec<Token>,
    /// Statements after which the scope stack had to be reset.
    pub scope_resets: usize,
}

impl AnalysisContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Outcome of analyzing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// The full token array with identifier kinds rewritten in place.
    pub tokens: Vec<Token>,
    /// Classified identifier occurrences, ready for presentation.
    pub classified: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    /// Declared symbols in declaration order.
    pub symbols: Vec<Symbol>,
    /// Deepest scope nesting reached, counting the global scope.
    pub peak_scope_depth: usize,
    /// Statements that left the scope stack unbalanced and were reset.
    pub scope_resets: usize,
}

impl AnalysisResult {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Kind of the first token spelled `text`, if any.
    #[must_use]
    pub fn kind_of(&self, text: &str) -> Option<TokenKind> {
        self.tokens
            .iter()
            .find(|token| token.text() == text)
            .map(Token::kind)
    }

    /// Symbol declared under `name`.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }
}
