//! Member sequences of brace- and paren-delimited blocks.
//!
//! Statement blocks (module, component, topology bodies) dispatch each member
//! through the statement resolver and resume after an abandoned member.
//! List blocks (enum constants, struct members, parameters, telemetry limits,
//! connections, instances) take one fixed production per element with an
//! optional `,` separator; an abandoned element is absorbed only when the
//! closing token comes next.

use tracing::trace;

use super::{Block, GrammarVisitor, Step};
use crate::core::analyzer::error::AnalysisError;
use crate::core::scanner::{Keyword, Modifiers, Operator, TokenKind};

/// Scope name for a parameter list whose owner has no valid name.
const ANONYMOUS_PARAMS: &str = "<params>";

impl GrammarVisitor<'_> {
    /// Statements up to the closing `}` of `block`.
    pub(super) fn member_sequence(&mut self, block: Block) -> Step {
        loop {
            if self.accept(&[Operator::RightBrace]).is_some() {
                return Ok(());
            }
            self.next_token("`}`")?;
            match self.statement(block) {
                Ok(()) => {}
                Err(AnalysisError::Resync { line }) => {
                    trace!(line, ?block, "member abandoned");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Run `element` repeatedly until `closer`, with optional `,` separators.
    fn list(&mut self, closer: Operator, element: fn(&mut Self) -> Step) -> Step {
        loop {
            if self.accept(&[closer]).is_some() {
                return Ok(());
            }
            let result = element(self);
            self.recover(result, closer)?;
            self.accept(&[Operator::Comma]);
        }
    }

    pub(super) fn enum_constants(&mut self) -> Step {
        self.list(Operator::RightBrace, Self::enum_constant)
    }

    pub(super) fn struct_members(&mut self) -> Step {
        self.list(Operator::RightBrace, Self::struct_member)
    }

    pub(super) fn telemetry_limits(&mut self) -> Step {
        self.list(Operator::RightBrace, Self::telemetry_limit)
    }

    pub(super) fn connections(&mut self) -> Step {
        self.list(Operator::RightBrace, Self::connection)
    }

    pub(super) fn instances(&mut self) -> Step {
        self.list(Operator::RightBrace, Self::qualified_identifier)
    }

    /// `[REF] ident : type` elements up to `)`, declared in a transient scope
    /// named after `owner`.
    pub(super) fn param_list(&mut self, owner: Option<&str>) -> Step {
        self.context
            .scopes
            .push(owner.unwrap_or(ANONYMOUS_PARAMS), TokenKind::Nil);
        let result = self.list(Operator::RightParen, Self::parameter);
        self.context.scopes.pop();
        result
    }

    fn parameter(&mut self) -> Step {
        self.accept(&[Keyword::Ref]);
        self.define(TokenKind::Parameter, Modifiers::empty())?;
        self.expect(&[Operator::Colon])?;
        self.type_name()
    }

    /// `phase` specifiers up to `}`. Other tokens are reported and skipped.
    pub(super) fn init_specifiers(&mut self) -> Step {
        loop {
            if self.accept(&[Operator::RightBrace]).is_some() {
                return Ok(());
            }
            let at = self.next_token("`}`")?;
            let token = self.cursor.token(at).clone();
            if token.text() != Keyword::Phase.as_str() {
                if token.kind() != TokenKind::String {
                    self.unexpected(&token);
                }
                continue;
            }
            match self.init_specifier() {
                Err(AnalysisError::Resync { .. })
                    if self.cursor.peek_is(&[Keyword::Phase]) => {}
                result => self.recover(result, Operator::RightBrace)?,
            }
        }
    }
}
