//! Recursive-descent walk over the token array.
//!
//! `GrammarVisitor` owns the cursor and the call-scoped `AnalysisContext`.
//! The statement loop dispatches on the current keyword to one visitor per
//! definition or specifier; each visitor consumes its production, registers
//! declarations, resolves references and reports diagnostics through the
//! sink. Recovery happens at two levels:
//!
//! - a mismatched required token is reported and, when the expected token
//!   appears later on the same line, parsing resumes there;
//! - when a required element runs into a `}` or into a statement keyword on a
//!   later line, the statement is abandoned (`AnalysisError::Resync`) and the
//!   enclosing member sequence, or the document loop, resumes at that token.
//!
//! Running out of tokens ends the document after a single diagnostic.

mod definitions;
mod expressions;
mod sequences;
mod specifiers;

use compiler_macros::EnumKindName;
use tracing::{debug, trace, warn};

use crate::core::analyzer::config::AnalyzerOptions;
use crate::core::analyzer::context::{AnalysisContext, AnalysisResult};
use crate::core::analyzer::cursor::{TokenCursor, matches_any};
use crate::core::analyzer::diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticSink, did_you_mean,
};
use crate::core::analyzer::error::{AnalysisError, CancellationFlag};
use crate::core::analyzer::symbol_table::{Symbol, SymbolError};
use crate::core::scanner::{
    Keyword, Modifiers, Operator, Terminal, Token, TokenKind, is_identifier,
    is_reserved,
};

/// Result of visiting one production.
pub(crate) type Step = Result<(), AnalysisError>;

/// The brace-delimited context a statement appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block {
    Document,
    Module,
    Component,
    Topology,
}

impl Block {
    /// Whether `statement` may appear directly inside this block.
    fn permits(self, statement: Statement) -> bool {
        use Statement::{
            ArrayDef, CommandSpec, ComponentDef, ComponentInstanceSpec,
            ConnectionGraphSpec, ConstantDef, EnumDef, EventSpec, ImportSpec,
            IncludeSpec, InstanceDef, InternalPortSpec, LocateSpec, MatchSpec,
            ModuleDef, ParamSpec, PortDef, PortInstanceSpec, StructDef,
            TelemetrySpec, TopologyDef, TypeDef,
        };
        match self {
            Block::Document => true,
            Block::Module => matches!(
                statement,
                ArrayDef
                    | ComponentDef
                    | ConstantDef
                    | EnumDef
                    | InstanceDef
                    | ModuleDef
                    | PortDef
                    | StructDef
                    | TopologyDef
                    | TypeDef
                    | LocateSpec
                    | IncludeSpec
            ),
            Block::Component => matches!(
                statement,
                ArrayDef
                    | ConstantDef
                    | EnumDef
                    | StructDef
                    | TypeDef
                    | CommandSpec(_)
                    | EventSpec
                    | IncludeSpec
                    | InternalPortSpec
                    | MatchSpec
                    | ParamSpec
                    | PortInstanceSpec(_)
                    | TelemetrySpec
            ),
            Block::Topology => matches!(
                statement,
                ComponentInstanceSpec(_)
                    | ConnectionGraphSpec(_)
                    | ImportSpec
                    | IncludeSpec
            ),
        }
    }
}

/// Every statement form, with the leading keyword where it selects a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumKindName)]
pub(crate) enum Statement {
    ArrayDef,
    ComponentDef,
    ConstantDef,
    InstanceDef,
    EnumDef,
    ModuleDef,
    PortDef,
    StructDef,
    TypeDef,
    TopologyDef,
    CommandSpec(Keyword),
    ComponentInstanceSpec(Keyword),
    ConnectionGraphSpec(Keyword),
    EventSpec,
    IncludeSpec,
    InitSpec,
    InternalPortSpec,
    LocateSpec,
    ParamSpec,
    PortInstanceSpec(Keyword),
    MatchSpec,
    TelemetrySpec,
    ImportSpec,
}

/// Outcome of a defining occurrence.
#[derive(Debug, Default)]
pub(crate) struct Definition {
    /// Declared name without any `$` escape.
    pub name: Option<String>,
    /// Whether a scope was pushed and must be closed by the caller.
    pub opened: bool,
}

/// Name under which an identifier is stored; `$x` declares `x`.
fn symbol_name(text: &str) -> &str {
    text.strip_prefix('$').unwrap_or(text)
}

/// "`x`" or "one of `x`, `y`".
fn describe<T: Terminal>(candidates: &[T]) -> String {
    match candidates {
        [only] => format!("`{}`", only.lexeme()),
        many => format!(
            "one of {}",
            many.iter()
                .map(|c| format!("`{}`", c.lexeme()))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

pub(crate) struct GrammarVisitor<'s> {
    cursor: TokenCursor,
    context: AnalysisContext,
    options: &'s AnalyzerOptions,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> GrammarVisitor<'s> {
    pub(crate) fn new(
        tokens: Vec<Token>,
        options: &'s AnalyzerOptions,
        sink: &'s mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            context: AnalysisContext::new(),
            options,
            sink,
        }
    }

    /// Visit every top-level statement. Returns `false` when stopped by
    /// `cancel` at a statement boundary.
    pub(crate) fn walk(&mut self, cancel: Option<&CancellationFlag>) -> bool {
        if self.cursor.is_empty() {
            return true;
        }
        loop {
            if cancel.is_some_and(CancellationFlag::is_cancelled) {
                debug!(index = self.cursor.index(), "analysis cancelled");
                return false;
            }
            match self.statement(Block::Document) {
                Ok(()) | Err(AnalysisError::Resync { .. }) => {}
                Err(AnalysisError::EndOfInput) => {
                    self.settle_scopes();
                    break;
                }
                Err(AnalysisError::Cancelled) => return false,
            }
            self.settle_scopes();
            if self.cursor.advance().is_none() {
                break;
            }
        }
        true
    }

    pub(crate) fn finish(self) -> AnalysisResult {
        let peak_scope_depth = self.context.scopes.peak_depth();
        AnalysisResult {
            tokens: self.cursor.into_tokens(),
            classified: self.context.classified,
            diagnostics: Vec::new(),
            symbols: self.context.symbols.into_symbols(),
            peak_scope_depth,
            scope_resets: self.context.scope_resets,
        }
    }

    /// Every top-level statement must leave only the global scope open.
    fn settle_scopes(&mut self) {
        let depth = self.context.scopes.depth();
        if depth != 1 {
            warn!(
                depth,
                scope = %self.context.scopes.path(),
                "scope stack unbalanced after statement; resetting"
            );
            self.context.scopes.reset();
            self.context.scope_resets += 1;
        }
    }

    /// Visit the statement starting at the current token.
    fn statement(&mut self, block: Block) -> Step {
        let Some(token) = self.cursor.current().cloned() else {
            return Ok(());
        };
        if token.is_trivia() || token.kind() == TokenKind::String {
            return Ok(());
        }
        match self.resolve_statement(&token, block) {
            Some(statement) => {
                debug!(
                    statement = statement.name(),
                    line = token.line(),
                    column = token.start_column(),
                    "visiting"
                );
                self.visit(statement)
            }
            None => {
                self.unexpected(&token);
                Ok(())
            }
        }
    }

    fn resolve_statement(&self, token: &Token, block: Block) -> Option<Statement> {
        if token.kind() != TokenKind::Keyword {
            return None;
        }
        let keyword = Keyword::from_lexeme(token.text())?;
        let in_topology = block == Block::Topology;
        let statement = match keyword {
            Keyword::Array => Statement::ArrayDef,
            Keyword::Active | Keyword::Passive | Keyword::Queued => {
                Statement::ComponentDef
            }
            Keyword::Constant => Statement::ConstantDef,
            Keyword::Instance if in_topology => {
                Statement::ComponentInstanceSpec(keyword)
            }
            Keyword::Instance => Statement::InstanceDef,
            Keyword::Enum => Statement::EnumDef,
            Keyword::Module => Statement::ModuleDef,
            Keyword::Port => Statement::PortDef,
            Keyword::Struct => Statement::StructDef,
            Keyword::Type => Statement::TypeDef,
            Keyword::Topology => Statement::TopologyDef,
            Keyword::Async | Keyword::Guarded | Keyword::Sync => {
                if self.cursor.peek_is(&[Keyword::Input]) {
                    Statement::PortInstanceSpec(keyword)
                } else {
                    Statement::CommandSpec(keyword)
                }
            }
            Keyword::Private => Statement::ComponentInstanceSpec(keyword),
            Keyword::Connections | Keyword::Health => {
                Statement::ConnectionGraphSpec(keyword)
            }
            Keyword::Include => Statement::IncludeSpec,
            Keyword::Phase => Statement::InitSpec,
            Keyword::Internal => Statement::InternalPortSpec,
            Keyword::Locate => Statement::LocateSpec,
            Keyword::Output => Statement::PortInstanceSpec(keyword),
            Keyword::Match => Statement::MatchSpec,
            Keyword::Import => Statement::ImportSpec,
            Keyword::Command | Keyword::Event | Keyword::Param | Keyword::Telemetry
            | Keyword::Text | Keyword::Time
                if in_topology =>
            {
                Statement::ConnectionGraphSpec(keyword)
            }
            Keyword::Text => Statement::PortInstanceSpec(keyword),
            Keyword::Event => {
                if self.cursor.peek_is(&[Keyword::Port]) {
                    Statement::PortInstanceSpec(keyword)
                } else {
                    Statement::EventSpec
                }
            }
            Keyword::Param => {
                if self.cursor.peek_is(&[Keyword::Get, Keyword::Set]) {
                    Statement::PortInstanceSpec(keyword)
                } else {
                    Statement::ParamSpec
                }
            }
            Keyword::Command => {
                if block == Block::Component
                    || self.cursor.peek_is(&[Keyword::Recv, Keyword::Reg, Keyword::Resp])
                {
                    Statement::PortInstanceSpec(keyword)
                } else {
                    Statement::ConnectionGraphSpec(keyword)
                }
            }
            Keyword::Time => {
                if self.cursor.peek_is(&[Keyword::Get]) {
                    Statement::PortInstanceSpec(keyword)
                } else {
                    Statement::ConnectionGraphSpec(keyword)
                }
            }
            Keyword::Telemetry => {
                if self.cursor.peek_is(&[Keyword::Port]) {
                    Statement::PortInstanceSpec(keyword)
                } else {
                    Statement::TelemetrySpec
                }
            }
            Keyword::Activity
            | Keyword::Always
            | Keyword::Assert
            | Keyword::At
            | Keyword::Base
            | Keyword::Block
            | Keyword::Change
            | Keyword::Component
            | Keyword::Cpu
            | Keyword::Default
            | Keyword::Diagnostic
            | Keyword::Drop
            | Keyword::False
            | Keyword::Fatal
            | Keyword::Format
            | Keyword::Get
            | Keyword::High
            | Keyword::Id
            | Keyword::Input
            | Keyword::Low
            | Keyword::On
            | Keyword::Opcode
            | Keyword::Orange
            | Keyword::Priority
            | Keyword::Queue
            | Keyword::Recv
            | Keyword::Red
            | Keyword::Ref
            | Keyword::Reg
            | Keyword::Resp
            | Keyword::Save
            | Keyword::Serial
            | Keyword::Set
            | Keyword::Severity
            | Keyword::Size
            | Keyword::Stack
            | Keyword::Throttle
            | Keyword::True
            | Keyword::Update
            | Keyword::Warning
            | Keyword::With
            | Keyword::Yellow => return None,
        };
        block.permits(statement).then_some(statement)
    }

    fn visit(&mut self, statement: Statement) -> Step {
        match statement {
            Statement::ArrayDef => self.array_definition(),
            Statement::ComponentDef => self.component_definition(),
            Statement::ConstantDef => self.constant_definition(),
            Statement::InstanceDef => self.instance_definition(),
            Statement::EnumDef => self.enum_definition(),
            Statement::ModuleDef => self.module_definition(),
            Statement::PortDef => self.port_definition(),
            Statement::StructDef => self.struct_definition(),
            Statement::TypeDef => self.type_definition(),
            Statement::TopologyDef => self.topology_definition(),
            Statement::CommandSpec(kind) => self.command_specifier(kind),
            Statement::ComponentInstanceSpec(kind) => {
                self.component_instance_specifier(kind)
            }
            Statement::ConnectionGraphSpec(kind) => {
                self.connection_graph_specifier(kind)
            }
            Statement::EventSpec => self.event_specifier(),
            Statement::IncludeSpec => self.include_specifier(),
            Statement::InitSpec => self.init_specifier(),
            Statement::InternalPortSpec => self.internal_port_specifier(),
            Statement::LocateSpec => self.locate_specifier(),
            Statement::ParamSpec => self.param_specifier(),
            Statement::PortInstanceSpec(kind) => self.port_instance_specifier(kind),
            Statement::MatchSpec => self.match_specifier(),
            Statement::TelemetrySpec => self.telemetry_specifier(),
            Statement::ImportSpec => self.import_specifier(),
        }
    }

    // ---- primitives -------------------------------------------------------

    fn report(&mut self, diagnostic: Diagnostic) {
        trace!(
            code = diagnostic.code.name(),
            line = diagnostic.token.line(),
            message = %diagnostic.message,
            "diagnostic"
        );
        self.sink.report(diagnostic);
    }

    fn error(&mut self, code: DiagnosticCode, message: String, token: Token) {
        self.report(Diagnostic::error(code, message, token));
    }

    fn unexpected(&mut self, token: &Token) {
        let suggestion = if token.kind() == TokenKind::Nil {
            did_you_mean(token.text(), Keyword::ALL.iter().map(Keyword::as_str))
        } else {
            None
        };
        self.report(
            Diagnostic::error(
                DiagnosticCode::UnexpectedToken,
                format!("Unexpected token: {}", token.text()),
                token.clone(),
            )
            .with_suggestion(suggestion),
        );
    }

    fn invalid_identifier(&mut self, token: &Token) {
        let suggestion = is_reserved(token.text()).then(|| {
            format!("escape the reserved word as `${}`", token.text())
        });
        self.report(
            Diagnostic::error(
                DiagnosticCode::InvalidIdentifier,
                format!("Invalid identifier: {}", token.text()),
                token.clone(),
            )
            .with_suggestion(suggestion),
        );
    }

    /// Advance to the next semantic token. At end of input, report that
    /// `expected` was not found and stop the document.
    fn next_token(&mut self, expected: &str) -> Result<usize, AnalysisError> {
        if let Some(at) = self.cursor.advance() {
            return Ok(at);
        }
        let last = self.cursor.current().cloned().unwrap_or_else(|| Token::marker(0, 0));
        self.error(
            DiagnosticCode::UnexpectedEndOfInput,
            format!("Expected {expected}, found end of input"),
            Token::marker(last.line(), last.end_column()),
        );
        Err(AnalysisError::EndOfInput)
    }

    /// Advance for a required element. A token that `accepts` rejects and that
    /// marks a recovery point abandons the statement without consuming it.
    fn next_required(
        &mut self,
        expected: &str,
        accepts: impl Fn(&Token) -> bool,
    ) -> Result<usize, AnalysisError> {
        let mark = self.cursor.checkpoint();
        let at = self.next_token(expected)?;
        if accepts(self.cursor.token(at)) || !self.is_recovery_point(mark, at) {
            return Ok(at);
        }

        let found = self.cursor.token(at).clone();
        let previous = self.cursor.token(mark);
        let anchor = if found.line() > previous.line() {
            Token::marker(previous.line(), previous.end_column())
        } else {
            found.clone()
        };
        self.error(
            DiagnosticCode::ExpectedToken,
            format!("Expected {expected}, found `{}`", found.text()),
            anchor,
        );
        self.cursor.restore(mark);
        trace!(line = found.line(), "abandoning statement");
        Err(AnalysisError::Resync { line: found.line() })
    }

    /// A closing brace, or a statement keyword that starts a later line.
    fn is_recovery_point(&self, mark: usize, at: usize) -> bool {
        let token = self.cursor.token(at);
        if token.text() == Operator::RightBrace.as_str() {
            return true;
        }
        token.kind() == TokenKind::Keyword
            && Keyword::from_lexeme(token.text()).is_some_and(Keyword::starts_statement)
            && token.line() > self.cursor.token(mark).line()
    }

    /// Require one of `candidates`. A mismatch is reported; if a candidate
    /// appears later on the same line the cursor jumps to it.
    fn expect<T: Terminal>(&mut self, candidates: &[T]) -> Result<Option<T>, AnalysisError> {
        let expected = describe(candidates);
        let at = self.next_required(&expected, |token| matches_any(token, candidates))?;
        let found = self.cursor.token(at).clone();
        if let Some(matched) = candidates.iter().copied().find(|c| found.text() == c.lexeme()) {
            return Ok(Some(matched));
        }

        let suggestion = did_you_mean(found.text(), candidates.iter().map(|c| c.lexeme()));
        let message = format!("Expected {expected}, found `{}`", found.text());
        self.report(
            Diagnostic::error(DiagnosticCode::ExpectedToken, message, found)
                .with_suggestion(suggestion),
        );

        let Some(rescue) = self.cursor.rescue(candidates) else {
            return Ok(None);
        };
        self.cursor.restore(rescue);
        trace!(index = rescue, "resumed at rescue token");
        let text = self.cursor.token(rescue).text();
        Ok(candidates.iter().copied().find(|c| text == c.lexeme()))
    }

    /// Consume the next token if it is one of `candidates`.
    fn accept<T: Terminal>(&mut self, candidates: &[T]) -> Option<T> {
        self.cursor.look_ahead(candidates, true)
    }

    /// Visit a defining occurrence of a name of `kind`.
    fn define(
        &mut self,
        kind: TokenKind,
        modifiers: Modifiers,
    ) -> Result<Definition, AnalysisError> {
        let at = self.next_required("identifier", |token| is_identifier(token.text()))?;
        let token = self.cursor.token(at).clone();
        if !is_identifier(token.text()) {
            self.invalid_identifier(&token);
            return Ok(Definition::default());
        }

        let name = symbol_name(token.text()).to_string();
        let modifiers = modifiers | Modifiers::DECLARATION;
        let declared = self.context.symbols.declare(Symbol {
            name: name.clone(),
            scope: self.context.scopes.path(),
            kind,
            modifiers,
            line: token.line(),
            column: token.start_column(),
        });
        match declared {
            Ok(true) => trace!(%name, kind = kind.name(), "declared"),
            Ok(false) => trace!(%name, "declared again in another scope; first declaration kept"),
            Err(SymbolError::DuplicateSymbol {
                kind: TokenKind::Namespace,
                ..
            }) if kind == TokenKind::Namespace => trace!(%name, "module reopened"),
            Err(err) => {
                debug!(%err, "duplicate declaration");
                if let Some(severity) = self.options.duplicate_declarations.severity() {
                    self.report(Diagnostic::new(
                        severity,
                        DiagnosticCode::DuplicateDeclaration,
                        format!("Duplicate declaration: {err}"),
                        token,
                    ));
                }
            }
        }

        self.classify(at, kind, modifiers);
        let opened = kind.opens_scope();
        if opened {
            self.context.scopes.push(name.clone(), kind);
            trace!(scope = %self.context.scopes.path(), "opened scope");
        }
        Ok(Definition {
            name: Some(name),
            opened,
        })
    }

    /// Resolve the referencing occurrence at `at` against the symbol table.
    fn resolve(&mut self, at: usize) {
        let token = self.cursor.token(at).clone();
        if !is_identifier(token.text()) {
            self.invalid_identifier(&token);
            return;
        }

        let name = symbol_name(token.text());
        let found = self
            .context
            .symbols
            .lookup(name)
            .map(|symbol| (symbol.kind, symbol.modifiers));
        if let Some((kind, modifiers)) = found {
            self.classify(at, kind, modifiers);
            return;
        }

        trace!(name, "unknown identifier");
        if let Some(severity) = self.options.unknown_identifiers.severity() {
            let suggestion = did_you_mean(name, self.context.symbols.names());
            self.report(
                Diagnostic::new(
                    severity,
                    DiagnosticCode::UnknownIdentifier,
                    format!("Unknown identifier: {}", token.text()),
                    token.clone(),
                )
                .with_suggestion(suggestion),
            );
        }
    }

    fn classify(&mut self, at: usize, kind: TokenKind, modifiers: Modifiers) {
        let token = self.cursor.token_mut(at);
        token.set_classification(kind, modifiers);
        let token = token.clone();
        self.context.classified.push(token);
    }

    fn close_scope(&mut self, opened: bool) {
        if opened && let Some(scope) = self.context.scopes.pop() {
            trace!(scope = %scope.name, "closed scope");
        }
    }

    /// Absorb an abandoned member when the sequence's `closer` is next.
    fn recover(&self, result: Step, closer: Operator) -> Step {
        match result {
            Err(AnalysisError::Resync { .. }) if self.cursor.peek_is(&[closer]) => Ok(()),
            other => other,
        }
    }
}
