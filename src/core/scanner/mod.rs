//! Scan FPP source text into a deterministic stream of tokens.
//!
//! The scanner is the first stage of the pipeline. It converts raw source
//! text into `Token` values with exact UTF-16 positions: identifiers (as
//! unclassified `Nil` tokens), keywords, builtin types, numbers, operators,
//! strings, comments and annotations.
//!
//! This module provides the reserved-word and operator tables plus the
//! identifier and number grammars (`lexicon`), the line-oriented lexer
//! (`lexer`), and the token model shared with the analyzer (`tokens`).
//! Common items are re-exported so callers can import from
//! `fpp_rs::core::scanner::{scan, Lexer, Token, TokenKind, ...}`.
//!
//! Scanning is a pure function of the input text and runs in linear time.
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::scanner::{scan, TokenKind};
//! let tokens = scan("module M {}");
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[0].kind(), TokenKind::Keyword);
//! assert_eq!(tokens[1].kind(), TokenKind::Nil);
//! ```
pub mod lexer;
pub mod lexicon;
pub mod tokens;

// Re-export common scanner API so users can write
// `use fpp_rs::core::scanner::{scan, Token, TokenKind, ...};`
pub use lexer::*;
pub use lexicon::*;
pub use tokens::*;
