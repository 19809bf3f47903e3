//! Editor-facing encoding of classified tokens.
//!
//! Editors receive semantic highlighting as a flat array of integers, five per
//! token: `[delta_line, delta_start, length, type_index, modifier_bits]`.
//! Lines and start columns are relative to the previous token; the start
//! column is absolute whenever the line changes. Type indices refer to
//! `SemanticTokenLegend::token_types` and modifier bits to
//! `SemanticTokenLegend::token_modifiers` (`1 << index`).
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::analyzer::analyze;
//! # use fpp_rs::core::scanner::scan;
//! # use fpp_rs::core::semantic_tokens::{encode, SemanticTokenLegend};
//! let result = analyze(scan("constant a = 1\nconstant b = a"));
//! let variable = SemanticTokenLegend::new().type_index("variable").unwrap_or_default();
//! assert_eq!(
//!     encode(&result.classified),
//!     [0, 9, 1, variable, 1, 1, 9, 1, variable, 1, 0, 4, 1, variable, 0]
//! );
//! ```

use serde::Serialize;

use crate::core::scanner::{Modifiers, Token, TokenKind};

/// Names of token types and modifiers, in encoding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticTokenLegend {
    pub token_types: Vec<&'static str>,
    pub token_modifiers: Vec<&'static str>,
}

impl Default for SemanticTokenLegend {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticTokenLegend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_types: TokenKind::ALL.iter().map(|k| k.legend_name()).collect(),
            token_modifiers: Modifiers::LEGEND.to_vec(),
        }
    }

    /// Index of the token type called `name`.
    #[must_use]
    pub fn type_index(&self, name: &str) -> Option<u32> {
        self.token_types
            .iter()
            .position(|t| *t == name)
            .and_then(|at| u32::try_from(at).ok())
    }
}

/// Legend index of `kind`.
#[must_use]
pub fn type_index(kind: TokenKind) -> u32 {
    TokenKind::ALL
        .iter()
        .position(|k| *k == kind)
        .and_then(|at| u32::try_from(at).ok())
        .unwrap_or_default()
}

/// Encode `tokens` in document order. Zero-length tokens are skipped.
#[must_use]
pub fn encode(tokens: &[Token]) -> Vec<u32> {
    let mut ordered: Vec<&Token> = tokens.iter().filter(|t| t.length() > 0).collect();
    ordered.sort_by_key(|t| (t.line(), t.start_column()));

    let mut data = Vec::with_capacity(ordered.len() * 5);
    let (mut line, mut column) = (0, 0);
    for token in ordered {
        let delta_line = token.line() - line;
        let delta_start = if delta_line == 0 {
            token.start_column() - column
        } else {
            token.start_column()
        };
        data.extend([
            delta_line,
            delta_start,
            token.length(),
            type_index(token.kind()),
            u32::from(token.modifiers().bits()),
        ]);
        line = token.line();
        column = token.start_column();
    }
    data
}
