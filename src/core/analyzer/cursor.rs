//! Cursor over the token array with trivia-skipping lookahead.
//!
//! The cursor always points at the most recently consumed token. `advance`
//! moves to the next token that carries grammar meaning, skipping comments,
//! annotations and line continuations. `checkpoint`/`restore` give cheap
//! backtracking for optional clauses and for abandoning a production.
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::analyzer::TokenCursor;
//! # use fpp_rs::core::scanner::{scan, Operator};
//! let mut cursor = TokenCursor::new(scan("a @ note\n= 1"));
//! assert_eq!(cursor.current().map(|t| t.text()), Some("a"));
//! assert!(cursor.look_ahead(&[Operator::Equals], true).is_some());
//! assert_eq!(cursor.current().map(|t| t.text()), Some("="));
//! let mark = cursor.checkpoint();
//! cursor.advance();
//! cursor.restore(mark);
//! assert_eq!(cursor.current().map(|t| t.text()), Some("="));
//! ```

use crate::core::scanner::{Terminal, Token};

#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the current token.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Token at `index`. Panics if out of range; indices come from the cursor.
    #[must_use]
    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub fn token_mut(&mut self, index: usize) -> &mut Token {
        &mut self.tokens[index]
    }

    /// Index of the first non-trivia token at or after `from`.
    #[must_use]
    pub fn next_semantic(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&at| !self.tokens[at].is_trivia())
    }

    /// Move to the next non-trivia token. Returns its index, or `None` at the
    /// end of the stream (the cursor does not move).
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.next_semantic(self.index + 1)?;
        self.index = next;
        Some(next)
    }

    /// The next non-trivia token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.next_semantic(self.index + 1).map(|at| &self.tokens[at])
    }

    /// Whether the next non-trivia token is spelled as one of `candidates`.
    #[must_use]
    pub fn peek_is<T: Terminal>(&self, candidates: &[T]) -> bool {
        self.peek().is_some_and(|token| matches_any(token, candidates))
    }

    /// If the next non-trivia token matches one of `candidates`, optionally
    /// consume it and return the matched terminal.
    pub fn look_ahead<T: Terminal>(&mut self, candidates: &[T], consume: bool) -> Option<T> {
        let at = self.next_semantic(self.index + 1)?;
        let matched = candidates
            .iter()
            .copied()
            .find(|c| self.tokens[at].text() == c.lexeme())?;
        if consume {
            self.index = at;
        }
        Some(matched)
    }

    /// First index after the current token, on the current token's line,
    /// whose text matches one of `candidates`.
    #[must_use]
    pub fn rescue<T: Terminal>(&self, candidates: &[T]) -> Option<usize> {
        let line = self.current()?.line();
        self.tokens[self.index + 1..]
            .iter()
            .take_while(|token| token.line() == line)
            .position(|token| matches_any(token, candidates))
            .map(|offset| self.index + 1 + offset)
    }

    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, checkpoint: usize) {
        self.index = checkpoint.min(self.tokens.len().saturating_sub(1));
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// Whether `token` is spelled as one of `candidates`.
#[must_use]
pub fn matches_any<T: Terminal>(token: &Token, candidates: &[T]) -> bool {
    candidates.iter().any(|c| token.text() == c.lexeme())
}
