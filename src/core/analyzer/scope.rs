//! Stack of currently open scopes.
//!
//! The bottom frame is the global scope and is never popped, so the depth is
//! always at least 1. Scopes are identified by their dotted path from the
//! global scope (`M.C`), which is what the symbol table records.

use crate::core::scanner::TokenKind;

/// Path recorded for declarations at the top level of a document.
pub const GLOBAL_SCOPE: &str = "<global>";

/// One open scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    /// Kind of the declaration that opened the scope; `Nil` for the global
    /// frame and for parameter lists.
    pub kind: TokenKind,
}

/// LIFO stack of open scopes with peak-depth tracking.
///
/// ## Examples
/// ```
/// # use fpp_rs::core::analyzer::ScopeStack;
/// # use fpp_rs::core::scanner::TokenKind;
/// let mut scopes = ScopeStack::new();
/// scopes.push("M", TokenKind::Namespace);
/// scopes.push("C", TokenKind::Component);
/// assert_eq!(scopes.path(), "M.C");
/// scopes.pop();
/// scopes.pop();
/// scopes.pop(); // global frame stays
/// assert_eq!(scopes.depth(), 1);
/// assert_eq!(scopes.peak_depth(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Scope>,
    peak: usize,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Scope {
                name: GLOBAL_SCOPE.to_string(),
                kind: TokenKind::Nil,
            }],
            peak: 1,
        }
    }

    pub fn push(&mut self, name: impl Into<String>, kind: TokenKind) {
        self.frames.push(Scope {
            name: name.into(),
            kind,
        });
        self.peak = self.peak.max(self.frames.len());
    }

    /// Pop the innermost scope. The global frame is never removed.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Drop every frame above the global one.
    pub fn reset(&mut self) {
        self.frames.truncate(1);
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Greatest depth reached since construction.
    #[must_use]
    pub fn peak_depth(&self) -> usize {
        self.peak
    }

    /// The innermost open scope.
    #[must_use]
    pub fn current(&self) -> &Scope {
        // frames is never empty
        &self.frames[self.frames.len() - 1]
    }

    /// Dotted path of the innermost scope, or `GLOBAL_SCOPE` at top level.
    #[must_use]
    pub fn path(&self) -> String {
        if self.frames.len() == 1 {
            return GLOBAL_SCOPE.to_string();
        }
        self.frames[1..]
            .iter()
            .map(|frame| frame.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}
