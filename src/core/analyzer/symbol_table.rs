//! Document-wide symbol table.
//!
//! The table is flat: one entry per distinct name in the document, recording
//! the scope that declared it. Lookups do not shadow by scope. The first
//! declaration of a name wins; a later declaration of the same name in a
//! different scope is accepted but does not replace the entry. Every
//! `(scope, name)` pair is remembered separately, so a second declaration in
//! any scope that already declared the name is a duplicate.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::core::scanner::{Modifiers, TokenKind};

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    /// Dotted path of the scope the name was declared in.
    pub scope: String,
    pub kind: TokenKind,
    /// Stored modifiers; never contains `DECLARATION`.
    pub modifiers: Modifiers,
    /// Position of the defining token.
    pub line: u32,
    pub column: u32,
}

/// Errors raised when registering a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("`{name}` is already declared in `{scope}` as {kind}")]
    DuplicateSymbol {
        name: String,
        scope: String,
        kind: TokenKind,
        line: u32,
        column: u32,
    },
}

/// Where and as what a name was first declared within one scope.
#[derive(Debug, Clone, Copy)]
struct ScopedDeclaration {
    kind: TokenKind,
    line: u32,
    column: u32,
}

/// Flat name-to-symbol table in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    /// Keyed by `(scope, name)`.
    scoped: HashMap<(String, String), ScopedDeclaration>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `symbol`.
    ///
    /// Returns `Ok(true)` when a new entry was created and `Ok(false)` when the
    /// name was already declared in another scope (the first entry is kept).
    ///
    /// # Errors
    /// `SymbolError::DuplicateSymbol` when the name is already declared in the
    /// same scope.
    pub fn declare(&mut self, mut symbol: Symbol) -> Result<bool, SymbolError> {
        symbol.modifiers.remove(Modifiers::DECLARATION);
        let key = (symbol.scope.clone(), symbol.name.clone());
        if let Some(existing) = self.scoped.get(&key) {
            return Err(SymbolError::DuplicateSymbol {
                name: symbol.name,
                scope: symbol.scope,
                kind: existing.kind,
                line: existing.line,
                column: existing.column,
            });
        }
        self.scoped.insert(
            key,
            ScopedDeclaration {
                kind: symbol.kind,
                line: symbol.line,
                column: symbol.column,
            },
        );
        if self.index.contains_key(&symbol.name) {
            return Ok(false);
        }
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(true)
    }

    /// Find the entry for `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&at| &self.symbols[at])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Symbols declared directly in `scope`.
    pub fn in_scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.symbols.iter().filter(move |s| s.scope == scope)
    }

    /// Declared names, used for suggestions.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Consume the table, yielding symbols in declaration order.
    #[must_use]
    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols
    }
}
