//! Diagnostics produced by scanning and analysis.
//!
//! A `Diagnostic` is immutable data: a severity, a structured code, a message,
//! the token it is anchored at, and an optional suggestion. The analyzer hands
//! every diagnostic to a `DiagnosticSink`; `DiagnosticCollector` is the
//! default sink and enforces the configured limit.
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::analyzer::{Diagnostic, DiagnosticCode, DiagnosticCollector, DiagnosticSink, Severity};
//! # use fpp_rs::core::scanner::{Token, TokenKind};
//! let mut sink = DiagnosticCollector::with_limit(1);
//! let anchor = Token::new(0, 0, "x", TokenKind::Nil);
//! sink.report(Diagnostic::error(DiagnosticCode::UnexpectedToken, "Unexpected token: x", anchor.clone()));
//! sink.report(Diagnostic::warning(DiagnosticCode::UnknownIdentifier, "dropped", anchor));
//! assert_eq!(sink.len(), 1);
//! assert!(sink.has_errors());
//! ```

use compiler_macros::EnumKindName;
use serde::Serialize;
use strsim::levenshtein;

use crate::core::scanner::{LexError, Token, split_lines};

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Structured diagnostic codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumKindName, Serialize)]
pub enum DiagnosticCode {
    // Lexical
    UnterminatedString,

    // Grammar
    UnexpectedToken,
    ExpectedToken,
    UnexpectedEndOfInput,
    InvalidType,
    InvalidExpression,
    InvalidIdentifier,
    StringExpected,

    // Semantic
    DuplicateDeclaration,
    UnknownIdentifier,
}

/// A message anchored at a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub token: Token,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        token: Token,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            token,
            suggestion: None,
        }
    }

    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(code: DiagnosticCode, message: impl Into<String>, token: Token) -> Self {
        Self::new(Severity::Error, code, message, token)
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        code: DiagnosticCode,
        message: impl Into<String>,
        token: Token,
    ) -> Self {
        Self::new(Severity::Warning, code, message, token)
    }

    /// Add a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Sort key placing diagnostics in document order.
    #[must_use]
    pub fn position(&self) -> (u32, u32) {
        (self.token.line(), self.token.start_column())
    }
}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Self {
        Diagnostic::error(
            DiagnosticCode::UnterminatedString,
            err.message(),
            err.token().clone(),
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.severity,
            self.token.line() + 1,
            self.token.start_column() + 1,
            self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

/// Receiver for diagnostics emitted during analysis.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collects diagnostics up to a limit.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    limit: Option<usize>,
    dropped: usize,
}

impl DiagnosticCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` diagnostics.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics discarded after the limit was reached.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of one severity, in report order.
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.limit.is_some_and(|limit| self.diagnostics.len() >= limit) {
            self.dropped += 1;
            return;
        }
        self.diagnostics.push(diagnostic);
    }
}

/// Return up to 3 suggestions by edit distance.
pub fn suggest<'a>(
    needle: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }

    let max_distance = match needle.chars().count() {
        0..=3 => 1,
        4..=6 => 2,
        7..=10 => 3,
        _ => 4,
    };

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|c| !c.is_empty() && *c != needle)
        .map(|c| (levenshtein(needle, c), c))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort_by(|(da, a), (db, b)| {
        da.cmp(db).then(a.len().cmp(&b.len())).then(a.cmp(b))
    });
    scored.dedup_by(|(_, a), (_, b)| a == b);

    scored.into_iter().take(3).map(|(_, s)| s).collect()
}

/// Format the best suggestions as a "did you mean" hint.
pub fn did_you_mean<'a>(
    needle: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let found = suggest(needle, candidates);
    match found.as_slice() {
        [] => None,
        [only] => Some(format!("did you mean `{only}`?")),
        many => Some(format!(
            "did you mean one of: {}?",
            many.iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// Render a diagnostic with its source line and a caret underline.
#[must_use]
pub fn render(diagnostic: &Diagnostic, source: &str) -> String {
    let lines = split_lines(source);
    let token = &diagnostic.token;
    let line_text = usize::try_from(token.line())
        .ok()
        .and_then(|row| lines.get(row).copied())
        .unwrap_or("");

    let prefix = chars_before(line_text, token.start_column());
    let width = chars_before(
        line_text.get(byte_offset(line_text, prefix)..).unwrap_or(""),
        token.length(),
    )
    .max(1);

    let mut out = format!(
        "{}[{}]:{}:{}: {}\n  {}\n  {}{}",
        diagnostic.severity,
        diagnostic.code.name(),
        token.line() + 1,
        token.start_column() + 1,
        diagnostic.message,
        line_text,
        " ".repeat(prefix),
        "^".repeat(width)
    );
    if let Some(suggestion) = &diagnostic.suggestion {
        out.push_str("\n  help: ");
        out.push_str(suggestion);
    }
    out
}

/// Number of chars covering the first `units` UTF-16 code units of `text`.
fn chars_before(text: &str, units: u32) -> usize {
    let mut seen = 0u32;
    let mut count = 0;
    for ch in text.chars() {
        if seen >= units {
            break;
        }
        seen += u32::try_from(ch.len_utf16()).unwrap_or(2);
        count += 1;
    }
    count
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(at, _)| at)
}
