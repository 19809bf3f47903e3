//! Lexical token definitions for the FPP scanner.
//!
//! A `Token` records where a lexeme sits in the document, its text, its
//! lexical or semantic `TokenKind` and its `Modifiers`.
//!
//! # Coordinates
//! Lines and columns are 0-based and measured in UTF-16 code units, the
//! convention editors use for positions. A token never spans lines: multi-line
//! constructs such as triple-quoted strings are emitted as one token per line.
//!
//! # Classification
//! The lexer assigns a structural kind (`Keyword`, `Number`, `Nil`, ...). The
//! analyzer later overwrites kind and modifiers of identifier tokens once their
//! semantic role is known; position and text never change after creation.

use bitflags::bitflags;
use compiler_macros::EnumKindName;
use serde::{Deserialize, Serialize};

/// Lexical and semantic token categories.
///
/// The first eight variants are assigned by the lexer. The remaining variants
/// are semantic kinds assigned by the analyzer to identifier occurrences.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumKindName, Serialize, Deserialize,
)]
pub enum TokenKind {
    /// Candidate identifier, not yet classified.
    Nil,
    /// String literal or one line of a triple-quoted string.
    String,
    /// `#` comment running to end of line.
    Comment,
    /// `@` or `@<` annotation running to end of line.
    Annotation,
    /// Numeric literal.
    Number,
    /// Operator or punctuation.
    Operator,
    /// Reserved word.
    Keyword,
    /// Builtin type name.
    Type,
    Component,
    Instance,
    Port,
    Topology,
    Namespace,
    Enum,
    EnumMember,
    Struct,
    TypeParam,
    Parameter,
    Variable,
    Specifier,
}

impl TokenKind {
    /// Every kind in legend order.
    pub const ALL: [TokenKind; 20] = [
        TokenKind::Nil,
        TokenKind::String,
        TokenKind::Comment,
        TokenKind::Annotation,
        TokenKind::Number,
        TokenKind::Operator,
        TokenKind::Keyword,
        TokenKind::Type,
        TokenKind::Component,
        TokenKind::Instance,
        TokenKind::Port,
        TokenKind::Topology,
        TokenKind::Namespace,
        TokenKind::Enum,
        TokenKind::EnumMember,
        TokenKind::Struct,
        TokenKind::TypeParam,
        TokenKind::Parameter,
        TokenKind::Variable,
        TokenKind::Specifier,
    ];

    /// Whether the kind was assigned by the analyzer rather than the lexer.
    #[must_use]
    pub fn is_semantic(self) -> bool {
        !matches!(
            self,
            TokenKind::Nil
                | TokenKind::String
                | TokenKind::Comment
                | TokenKind::Annotation
                | TokenKind::Number
                | TokenKind::Operator
                | TokenKind::Keyword
                | TokenKind::Type
        )
    }

    /// Whether declaring a name of this kind opens a new scope.
    #[must_use]
    pub fn opens_scope(self) -> bool {
        matches!(
            self,
            TokenKind::Enum
                | TokenKind::Component
                | TokenKind::Namespace
                | TokenKind::Instance
                | TokenKind::Struct
                | TokenKind::Topology
        )
    }

    /// Name of this kind in the semantic-token legend.
    #[must_use]
    pub fn legend_name(self) -> &'static str {
        match self {
            TokenKind::Nil => "nil",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::Annotation => "annotation",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Keyword => "keyword",
            TokenKind::Type => "type",
            TokenKind::Component => "component",
            TokenKind::Instance => "instance",
            TokenKind::Port => "port",
            TokenKind::Topology => "topology",
            TokenKind::Namespace => "namespace",
            TokenKind::Enum => "enum",
            TokenKind::EnumMember => "enumMember",
            TokenKind::Struct => "struct",
            TokenKind::TypeParam => "typeParameter",
            TokenKind::Parameter => "parameter",
            TokenKind::Variable => "variable",
            TokenKind::Specifier => "specifier",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Modifiers attached to a classified token.
    ///
    /// `DECLARATION` marks the defining occurrence of a name and is never
    /// stored in the symbol table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const DECLARATION = 1;
        const READONLY = 1 << 1;
        const ABSTRACT = 1 << 2;
        const ASYNC = 1 << 3;
    }
}

impl Modifiers {
    /// Legend names in bit order.
    pub const LEGEND: [&'static str; 4] =
        ["declaration", "readonly", "abstract", "async"];
}

/// A lexeme with its position, text and classification.
///
/// ## Examples
/// ```
/// # use fpp_rs::core::scanner::{Token, TokenKind, Modifiers};
/// let mut t = Token::new(0, 9, "a", TokenKind::Nil);
/// assert_eq!(t.end_column(), 10);
/// t.set_classification(TokenKind::Variable, Modifiers::DECLARATION);
/// assert_eq!(t.kind(), TokenKind::Variable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    line: u32,
    start_column: u32,
    length: u32,
    kind: TokenKind,
    text: String,
    modifiers: Modifiers,
}

impl Token {
    /// Create a token whose length is the UTF-16 length of `text`.
    #[must_use]
    pub fn new(
        line: u32,
        start_column: u32,
        text: impl Into<String>,
        kind: TokenKind,
    ) -> Self {
        let text = text.into();
        let length = utf16_len(&text);
        Self {
            line,
            start_column,
            length,
            kind,
            text,
            modifiers: Modifiers::empty(),
        }
    }

    /// A zero-length marker token, used to anchor diagnostics between tokens.
    #[must_use]
    pub fn marker(line: u32, column: u32) -> Self {
        Self::new(line, column, "", TokenKind::Nil)
    }

    /// 0-based line index.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-based start column in UTF-16 code units.
    #[must_use]
    pub fn start_column(&self) -> u32 {
        self.start_column
    }

    /// Length in UTF-16 code units.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Column one past the last code unit of the token.
    #[must_use]
    pub fn end_column(&self) -> u32 {
        self.start_column + self.length
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Overwrite kind and modifiers once the semantic role is known.
    pub fn set_classification(&mut self, kind: TokenKind, modifiers: Modifiers) {
        self.kind = kind;
        self.modifiers = modifiers;
    }

    /// Whether this token carries no grammar meaning (comments, annotations
    /// and line continuations).
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment | TokenKind::Annotation)
            || (self.kind == TokenKind::Operator && self.text == "\\")
    }
}

/// Number of UTF-16 code units needed to encode `text`.
#[must_use]
pub fn utf16_len(text: &str) -> u32 {
    let units: usize = text.chars().map(char::len_utf16).sum();
    u32::try_from(units).unwrap_or(u32::MAX)
}
