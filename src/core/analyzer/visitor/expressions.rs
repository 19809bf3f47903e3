//! Expressions, type names, identifiers and string literals.

use tracing::trace;

use super::{GrammarVisitor, Step};
use crate::core::analyzer::diagnostics::{Diagnostic, DiagnosticCode, did_you_mean};
use crate::core::analyzer::error::AnalysisError;
use crate::core::scanner::{
    BuiltinType, Keyword, Operator, Token, TokenKind, is_identifier,
};

/// Whether `token` can begin an expression.
fn starts_expression(token: &Token) -> bool {
    matches!(token.kind(), TokenKind::Number | TokenKind::String)
        || matches!(
            Operator::from_lexeme(token.text()),
            Some(Operator::Minus | Operator::LeftParen | Operator::LeftBracket)
        )
        || matches!(Keyword::from_lexeme(token.text()), Some(Keyword::True | Keyword::False))
        || is_identifier(token.text())
}

fn starts_type(token: &Token) -> bool {
    BuiltinType::from_lexeme(token.text()).is_some() || is_identifier(token.text())
}

impl GrammarVisitor<'_> {
    /// `expression := [-] primary { (+ | - | * | /) [-] primary }`
    ///
    /// Operators chain flat, left to right, with no precedence. Chains and
    /// leading signs are consumed iteratively; only brackets nest.
    pub(super) fn expression(&mut self) -> Step {
        while self.operand()? {
            if self.accept(&Operator::BINARY).is_none() {
                break;
            }
        }
        Ok(())
    }

    /// One signed primary. Returns `false` after reporting a token that cannot
    /// be an operand, which ends the chain.
    fn operand(&mut self) -> Result<bool, AnalysisError> {
        loop {
            let at = self.next_required("expression", starts_expression)?;
            let token = self.cursor.token(at).clone();
            trace!(text = token.text(), "expression");

            match Operator::from_lexeme(token.text()) {
                Some(Operator::Minus) => continue,
                Some(Operator::LeftParen) => {
                    self.expression()?;
                    self.expect(&[Operator::RightParen])?;
                }
                Some(Operator::LeftBracket) => self.array_literal()?,
                _ => match token.kind() {
                    TokenKind::String => self.string_continuation(),
                    TokenKind::Number => {}
                    TokenKind::Keyword
                        if matches!(
                            Keyword::from_lexeme(token.text()),
                            Some(Keyword::True | Keyword::False)
                        ) => {}
                    _ if is_identifier(token.text()) => {
                        self.resolve(at);
                        self.qualified_tail()?;
                    }
                    _ => {
                        self.error(
                            DiagnosticCode::InvalidExpression,
                            format!("Invalid expression: {}", token.text()),
                            token,
                        );
                        return Ok(false);
                    }
                },
            }
            return Ok(true);
        }
    }

    /// Elements after an opening `[`, separated by commas or line breaks.
    fn array_literal(&mut self) -> Step {
        if self.accept(&[Operator::RightBracket]).is_some() {
            return Ok(());
        }
        loop {
            self.expression()?;
            let separated = self.accept(&[Operator::Comma]).is_some();
            if self.accept(&[Operator::RightBracket]).is_some() {
                return Ok(());
            }
            if !separated
                && !self.next_starts_line()
                && self.expect(&[Operator::Comma, Operator::RightBracket])?
                    == Some(Operator::RightBracket)
            {
                return Ok(());
            }
        }
    }

    fn next_starts_line(&self) -> bool {
        match (self.cursor.current(), self.cursor.peek()) {
            (Some(current), Some(next)) => next.line() > current.line(),
            _ => false,
        }
    }

    /// `type-name := builtin | string [size expression] | qual-ident`
    pub(super) fn type_name(&mut self) -> Step {
        let at = self.next_required("type name", starts_type)?;
        let token = self.cursor.token(at).clone();

        if let Some(builtin) = BuiltinType::from_lexeme(token.text()) {
            if builtin == BuiltinType::String && self.accept(&[Keyword::Size]).is_some() {
                self.expression()?;
            }
            return Ok(());
        }
        if is_identifier(token.text()) {
            self.resolve(at);
            return self.qualified_tail();
        }

        let suggestion = {
            let mut candidates: Vec<&str> =
                BuiltinType::ALL.iter().map(BuiltinType::as_str).collect();
            candidates.extend(self.context.symbols.names());
            did_you_mean(token.text(), candidates)
        };
        let message = format!("Invalid type: {}", token.text());
        self.report(
            Diagnostic::error(DiagnosticCode::InvalidType, message, token)
                .with_suggestion(suggestion),
        );
        Ok(())
    }

    /// A single referenced name.
    pub(super) fn identifier(&mut self) -> Step {
        let at = self.next_required("identifier", |token| is_identifier(token.text()))?;
        self.resolve(at);
        Ok(())
    }

    /// `qual-ident := identifier { . identifier }`, resolved segment by segment.
    pub(super) fn qualified_identifier(&mut self) -> Step {
        self.identifier()?;
        self.qualified_tail()
    }

    fn qualified_tail(&mut self) -> Step {
        while self.accept(&[Operator::Dot]).is_some() {
            self.identifier()?;
        }
        Ok(())
    }

    /// A string literal; adjacent string tokens concatenate.
    pub(super) fn string(&mut self) -> Step {
        let at = self.next_required("string literal", |token| {
            token.kind() == TokenKind::String
        })?;
        let token = self.cursor.token(at).clone();
        if token.kind() == TokenKind::String {
            self.string_continuation();
        } else {
            self.error(
                DiagnosticCode::StringExpected,
                format!("String expected, found `{}`", token.text()),
                token,
            );
        }
        Ok(())
    }

    fn string_continuation(&mut self) {
        while self
            .cursor
            .peek()
            .is_some_and(|token| token.kind() == TokenKind::String)
        {
            self.cursor.advance();
        }
    }
}
