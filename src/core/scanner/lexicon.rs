//! Reserved words, builtin types, operators and the literal grammars.
//!
//! Each table is a closed enumeration deriving `Lexeme`, so lookups are
//! exhaustive matches generated at compile time rather than string maps.

use compiler_macros::{EnumKindName, Lexeme};

/// Reserved words of the modeling language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumKindName, Lexeme)]
#[lexeme(rename_all = "lowercase")]
pub enum Keyword {
    Active,
    Activity,
    Always,
    Array,
    Assert,
    Async,
    At,
    Base,
    Block,
    Change,
    Command,
    Component,
    Connections,
    Constant,
    Cpu,
    Default,
    Diagnostic,
    Drop,
    Enum,
    Event,
    False,
    Fatal,
    Format,
    Get,
    Guarded,
    Health,
    High,
    Id,
    Import,
    Include,
    Input,
    Instance,
    Internal,
    Locate,
    Low,
    Match,
    Module,
    On,
    Opcode,
    Orange,
    Output,
    Param,
    Passive,
    Phase,
    Port,
    Priority,
    Private,
    Queue,
    Queued,
    Recv,
    Red,
    Ref,
    Reg,
    Resp,
    Save,
    Serial,
    Set,
    Severity,
    Size,
    Stack,
    Struct,
    Sync,
    Telemetry,
    Text,
    Throttle,
    Time,
    Topology,
    True,
    Type,
    Update,
    Warning,
    With,
    Yellow,
}

impl Keyword {
    /// Whether the keyword can begin a definition or specifier.
    ///
    /// The analyzer treats such a keyword at the start of a new line as the
    /// beginning of the next statement when the current one is incomplete.
    #[must_use]
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Active
                | Keyword::Array
                | Keyword::Async
                | Keyword::Command
                | Keyword::Connections
                | Keyword::Constant
                | Keyword::Enum
                | Keyword::Event
                | Keyword::Guarded
                | Keyword::Health
                | Keyword::Import
                | Keyword::Include
                | Keyword::Instance
                | Keyword::Internal
                | Keyword::Locate
                | Keyword::Match
                | Keyword::Module
                | Keyword::Output
                | Keyword::Param
                | Keyword::Passive
                | Keyword::Phase
                | Keyword::Port
                | Keyword::Private
                | Keyword::Queued
                | Keyword::Struct
                | Keyword::Sync
                | Keyword::Telemetry
                | Keyword::Text
                | Keyword::Time
                | Keyword::Topology
                | Keyword::Type
        )
    }

    /// Limit colors are only reserved inside telemetry limit blocks and stay
    /// usable as names everywhere else.
    #[must_use]
    pub fn is_contextual(self) -> bool {
        matches!(self, Keyword::Orange | Keyword::Red | Keyword::Yellow)
    }
}

/// Builtin type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumKindName, Lexeme)]
pub enum BuiltinType {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    #[lexeme = "bool"]
    Bool,
    #[lexeme = "string"]
    String,
}

/// Operators and punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumKindName, Lexeme)]
pub enum Operator {
    #[lexeme = "("]
    LeftParen,
    #[lexeme = ")"]
    RightParen,
    #[lexeme = "["]
    LeftBracket,
    #[lexeme = "]"]
    RightBracket,
    #[lexeme = "{"]
    LeftBrace,
    #[lexeme = "}"]
    RightBrace,
    #[lexeme = "*"]
    Star,
    #[lexeme = "+"]
    Plus,
    #[lexeme = ","]
    Comma,
    #[lexeme = "-"]
    Minus,
    #[lexeme = "->"]
    Arrow,
    #[lexeme = "."]
    Dot,
    #[lexeme = "/"]
    Slash,
    #[lexeme = ":"]
    Colon,
    #[lexeme = ";"]
    Semicolon,
    #[lexeme = "="]
    Equals,
    #[lexeme = "\\"]
    Backslash,
}

impl Operator {
    /// Binary operators chained by expressions.
    pub const BINARY: [Operator; 4] =
        [Operator::Minus, Operator::Plus, Operator::Star, Operator::Slash];
}

/// Delimiters that introduce strings, comments and annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumKindName, Lexeme)]
pub enum Delimiter {
    #[lexeme = "#"]
    Comment,
    #[lexeme = "@"]
    PreAnnotation,
    #[lexeme = "@<"]
    PostAnnotation,
    #[lexeme = "\""]
    Quote,
    #[lexeme = "\"\"\""]
    TripleQuote,
    #[lexeme = "\\"]
    Continuation,
}

/// A grammar terminal the analyzer can expect or look ahead for.
pub trait Terminal: Copy {
    /// Source spelling of the terminal.
    fn lexeme(self) -> &'static str;
}

impl Terminal for Keyword {
    fn lexeme(self) -> &'static str {
        self.as_str()
    }
}

impl Terminal for Operator {
    fn lexeme(self) -> &'static str {
        self.as_str()
    }
}

/// Whether `ch` terminates the token being scanned.
#[must_use]
pub fn is_breakpoint(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '#'
            | '@'
            | '"'
            | '\\'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '*'
            | '+'
            | ','
            | '-'
            | '.'
            | '/'
            | ':'
            | ';'
            | '='
    )
}

/// Whether `text` is a reserved word or a builtin type name. Contextual
/// keywords are not reserved.
#[must_use]
pub fn is_reserved(text: &str) -> bool {
    Keyword::from_lexeme(text).is_some_and(|keyword| !keyword.is_contextual())
        || BuiltinType::from_lexeme(text).is_some()
}

/// Validate the lexical shape of an identifier.
///
/// A single leading `$` escapes a reserved word (`$active`), `$$` is never
/// valid. Otherwise the first character is an ASCII letter or `_` and the
/// rest are ASCII letters, digits or `_`.
///
/// ## Examples
/// ```
/// # use fpp_rs::core::scanner::is_identifier;
/// assert!(is_identifier("Color"));
/// assert!(is_identifier("$active"));
/// assert!(!is_identifier("active"));
/// assert!(!is_identifier("$$x"));
/// assert!(!is_identifier("9lives"));
/// ```
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    if let Some(escaped) = text.strip_prefix('$') {
        return !escaped.starts_with('$') && is_plain_identifier(escaped);
    }
    !is_reserved(text) && is_plain_identifier(text)
}

fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate the lexical shape of a numeric literal.
///
/// ## Examples
/// ```
/// # use fpp_rs::core::scanner::is_number;
/// assert!(is_number("42"));
/// assert!(is_number("-1.5"));
/// assert!(is_number("0x1F"));
/// assert!(is_number(".5"));
/// assert!(!is_number("--1"));
/// assert!(!is_number("0x"));
/// assert!(!is_number("."));
/// ```
#[must_use]
pub fn is_number(text: &str) -> bool {
    let unsigned = match text.strip_prefix('-') {
        Some(rest) if rest.starts_with('-') => return false,
        Some(rest) => rest,
        None => text,
    };

    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    match unsigned.split_once('.') {
        Some((whole, fraction)) => {
            !(whole.is_empty() && fraction.is_empty())
                && all_digits(whole)
                && all_digits(fraction)
        }
        None => !unsigned.is_empty() && all_digits(unsigned),
    }
}

fn all_digits(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}
