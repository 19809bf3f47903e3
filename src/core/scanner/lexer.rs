//! Tokenize FPP source text into a flat, position-ordered token stream.
//!
//! The lexer works line by line. Within a line it skips spaces and tabs,
//! then extends a token until the next breakpoint character (whitespace, an
//! operator or a delimiter). A `.` directly followed by a digit does not break
//! a token, so `1.5` and `.5` stay whole. When the token would be empty the
//! breakpoint itself is the token, widened to `->`, `@<` or `"""` when those
//! two- and three-character forms start at that position.
//!
//! Comments and annotations absorb the rest of their line. A `"` string ends
//! at the next unescaped `"` on the same line; a `"""` string may span lines
//! and is emitted as one `String` token per physical line. Unterminated
//! strings are closed at end of line (or end of document) and reported as
//! `LexError`s instead of being dropped.
//!
//! Lines are split on CRLF, CR and LF. Columns are UTF-16 code units.
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::scanner::{scan, TokenKind};
//! let tokens = scan("constant a = 1.5 # note");
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Keyword,
//!         TokenKind::Nil,
//!         TokenKind::Operator,
//!         TokenKind::Number,
//!         TokenKind::Comment,
//!     ]
//! );
//! assert_eq!(tokens[3].text(), "1.5");
//! ```

use thiserror::Error;
use tracing::trace;

use crate::core::scanner::lexicon::{
    BuiltinType, Delimiter, Keyword, Operator, is_breakpoint, is_number,
};
use crate::core::scanner::tokens::{Token, TokenKind};

/// A lexical problem anchored at the token it affects.
///
/// ## Examples
/// ```
/// # use fpp_rs::core::scanner::{LexError, Token, TokenKind};
/// let err = LexError::new("oops", Token::new(0, 0, "\"x", TokenKind::String));
/// assert_eq!(err.to_string(), "oops");
/// assert_eq!(err.token().text(), "\"x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    message: String,
    token: Token,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(message: impl Into<String>, token: Token) -> Self {
        Self {
            message: message.into(),
            token,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the token the error is anchored at.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }
}

/// Tokens and lexical errors produced by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Scan `text` and return only the tokens.
#[must_use]
pub fn scan(text: &str) -> Vec<Token> {
    Lexer::tokenize(text).tokens
}

/// Split on CRLF, CR or LF. A trailing terminator yields a final empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}

/// One physical line with a char-index to UTF-16 column table.
struct SourceLine {
    chars: Vec<char>,
    columns: Vec<u32>,
}

impl SourceLine {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut columns = Vec::with_capacity(chars.len() + 1);
        let mut column = 0u32;
        columns.push(column);
        for ch in &chars {
            column = column.saturating_add(u32::try_from(ch.len_utf16()).unwrap_or(2));
            columns.push(column);
        }
        Self { chars, columns }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn starts_with(&self, at: usize, pattern: &str) -> bool {
        let mut index = at;
        for expected in pattern.chars() {
            if self.chars.get(index) != Some(&expected) {
                return false;
            }
            index += 1;
        }
        true
    }

    fn find(&self, from: usize, pattern: &str) -> Option<usize> {
        (from..self.len()).find(|&at| self.starts_with(at, pattern))
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// End of the token starting at `start` (exclusive char index).
    fn close_index(&self, start: usize) -> usize {
        let mut end = start;
        loop {
            while end < self.len() && !is_breakpoint(self.chars[end]) {
                end += 1;
            }
            let dot_before_digit = self.chars.get(end) == Some(&'.')
                && self.chars.get(end + 1).is_some_and(char::is_ascii_digit);
            if !dot_before_digit {
                break;
            }
            end += 1;
        }

        if end > start {
            end
        } else if self.starts_with(start, "->") || self.starts_with(start, "@<") {
            start + 2
        } else if self.starts_with(start, "\"\"\"") {
            start + 3
        } else {
            start + 1
        }
    }

    /// Index of the first unescaped `"` at or after `from`.
    fn closing_quote(&self, from: usize) -> Option<usize> {
        (from..self.len()).find(|&at| {
            self.chars[at] == '"' && {
                let backslashes = self.chars[from..at]
                    .iter()
                    .rev()
                    .take_while(|&&c| c == '\\')
                    .count();
                backslashes % 2 == 0
            }
        })
    }
}

/// Line-oriented scanner over a whole document.
#[derive(Debug)]
pub struct Lexer<'a> {
    lines: Vec<&'a str>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: split_lines(text),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scan `text` in one call.
    #[must_use]
    pub fn tokenize(text: &'a str) -> ScanResult {
        Self::new(text).run()
    }

    /// Consume the lexer and scan every line.
    #[must_use]
    pub fn run(mut self) -> ScanResult {
        let mut row = 0;
        let mut resume = 0;
        while row < self.lines.len() {
            match self.scan_line(row, resume) {
                Some((next_row, next_index)) => {
                    row = next_row;
                    resume = next_index;
                }
                None => {
                    row += 1;
                    resume = 0;
                }
            }
        }
        trace!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scan complete"
        );
        ScanResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    /// Scan one line from char index `from`. Returns the position to resume
    /// at when a triple-quoted string moved scanning onto a later line.
    fn scan_line(&mut self, row: usize, from: usize) -> Option<(usize, usize)> {
        let line = SourceLine::new(self.lines[row]);
        let mut index = from;

        while index < line.len() {
            if matches!(line.chars[index], ' ' | '\t') {
                index += 1;
                continue;
            }

            let close = line.close_index(index);
            let lexeme = line.slice(index, close);
            match Delimiter::from_lexeme(&lexeme) {
                Some(Delimiter::Comment) => {
                    self.push(row, &line, index, line.len(), TokenKind::Comment);
                    index = line.len();
                }
                Some(Delimiter::PreAnnotation | Delimiter::PostAnnotation) => {
                    self.push(row, &line, index, line.len(), TokenKind::Annotation);
                    index = line.len();
                }
                Some(Delimiter::Quote) => {
                    index = self.scan_string(row, &line, index);
                }
                Some(Delimiter::TripleQuote) => {
                    if let Some(end) = line.find(close, "\"\"\"") {
                        index = end + 3;
                        self.push(row, &line, close - 3, index, TokenKind::String);
                    } else {
                        self.push(row, &line, index, line.len(), TokenKind::String);
                        return Some(self.scan_block_string(row));
                    }
                }
                Some(Delimiter::Continuation) | None => {
                    self.push(row, &line, index, close, classify(&lexeme));
                    index = close;
                }
            }
        }
        None
    }

    fn scan_string(&mut self, row: usize, line: &SourceLine, open: usize) -> usize {
        match line.closing_quote(open + 1) {
            Some(quote) => {
                self.push(row, line, open, quote + 1, TokenKind::String);
                quote + 1
            }
            None => {
                let token = self.push(row, line, open, line.len(), TokenKind::String);
                self.errors
                    .push(LexError::new("unterminated string literal", token));
                line.len()
            }
        }
    }

    /// Continue a `"""` string opened on `open_row`, one token per line.
    fn scan_block_string(&mut self, open_row: usize) -> (usize, usize) {
        let opening = self.tokens.last().cloned();
        for row in open_row + 1..self.lines.len() {
            let line = SourceLine::new(self.lines[row]);
            if let Some(end) = line.find(0, "\"\"\"") {
                self.push(row, &line, 0, end + 3, TokenKind::String);
                return (row, end + 3);
            }
            self.push(row, &line, 0, line.len(), TokenKind::String);
        }

        if let Some(token) = opening {
            self.errors.push(LexError::new(
                "unterminated triple-quoted string literal",
                token,
            ));
        }
        (self.lines.len(), 0)
    }

    fn push(
        &mut self,
        row: usize,
        line: &SourceLine,
        start: usize,
        end: usize,
        kind: TokenKind,
    ) -> Token {
        let token = Token::new(
            u32::try_from(row).unwrap_or(u32::MAX),
            line.columns[start],
            line.slice(start, end),
            kind,
        );
        self.tokens.push(token.clone());
        token
    }
}

/// Lexical category of a plain lexeme.
#[must_use]
pub fn classify(lexeme: &str) -> TokenKind {
    if BuiltinType::from_lexeme(lexeme).is_some() {
        TokenKind::Type
    } else if Keyword::from_lexeme(lexeme).is_some() {
        TokenKind::Keyword
    } else if Operator::from_lexeme(lexeme).is_some() {
        TokenKind::Operator
    } else if is_number(lexeme) {
        TokenKind::Number
    } else {
        TokenKind::Nil
    }
}
