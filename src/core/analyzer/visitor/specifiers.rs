//! Specifier visitors.
//!
//! Productions, entered with the cursor on the leading keyword:
//! - `command`    := (ASYNC | GUARDED | SYNC) COMMAND ident [`(` params `)`]
//!   [OPCODE expr] [PRIORITY expr] [queue-full]
//! - `instance`   := [PRIVATE] INSTANCE qual-ident
//! - `graph`      := CONNECTIONS ident `{` connection* `}`
//!   | pattern-kind CONNECTIONS INSTANCE qual-ident [`{` qual-ident* `}`]
//! - `event`      := EVENT ident [`(` params `)`] SEVERITY severity [ID expr]
//!   FORMAT string [THROTTLE expr]
//! - `include`    := INCLUDE string
//! - `init`       := PHASE expr string
//! - `internal`   := INTERNAL PORT ident [`(` params `)`] [PRIORITY expr] [queue-full]
//! - `locate`     := LOCATE locate-kind qual-ident AT string
//! - `param`      := PARAM ident `:` type [DEFAULT expr] [ID expr]
//!   [SET OPCODE expr] [SAVE OPCODE expr]
//! - `port`       := general-kind PORT ident `:` [`[` expr `]`] (qual-ident | SERIAL)
//!   [PRIORITY expr] [queue-full] | special-kind PORT ident
//! - `match`      := MATCH ident WITH ident
//! - `telemetry`  := TELEMETRY ident `:` type [ID expr] [UPDATE (ALWAYS | ON CHANGE)]
//!   [FORMAT string] [LOW `{` limit* `}`] [HIGH `{` limit* `}`]
//! - `import`     := IMPORT qual-ident

use super::{GrammarVisitor, Step};
use crate::core::scanner::{Keyword, Modifiers, Operator, TokenKind};

const QUEUE_FULL: [Keyword; 3] = [Keyword::Assert, Keyword::Block, Keyword::Drop];

fn async_modifier(kind: Keyword) -> Modifiers {
    if kind == Keyword::Async {
        Modifiers::ASYNC
    } else {
        Modifiers::empty()
    }
}

impl GrammarVisitor<'_> {
    pub(super) fn command_specifier(&mut self, kind: Keyword) -> Step {
        self.expect(&[Keyword::Command])?;
        let definition = self.define(TokenKind::Specifier, async_modifier(kind))?;
        if self.accept(&[Operator::LeftParen]).is_some() {
            self.param_list(definition.name.as_deref())?;
        }
        for clause in [Keyword::Opcode, Keyword::Priority] {
            if self.accept(&[clause]).is_some() {
                self.expression()?;
            }
        }
        if kind == Keyword::Async {
            self.accept(&QUEUE_FULL);
        }
        Ok(())
    }

    pub(super) fn component_instance_specifier(&mut self, kind: Keyword) -> Step {
        if kind == Keyword::Private {
            self.expect(&[Keyword::Instance])?;
        }
        self.qualified_identifier()
    }

    pub(super) fn connection_graph_specifier(&mut self, kind: Keyword) -> Step {
        if kind == Keyword::Connections {
            self.define(TokenKind::Specifier, Modifiers::empty())?;
            if self.expect(&[Operator::LeftBrace])?.is_some() {
                self.connections()?;
            }
            return Ok(());
        }

        self.expect(&[Keyword::Connections])?;
        self.expect(&[Keyword::Instance])?;
        self.qualified_identifier()?;
        if self.accept(&[Operator::LeftBrace]).is_some() {
            self.instances()?;
        }
        Ok(())
    }

    /// `port-instance-id [ [ expr ] ] -> port-instance-id [ [ expr ] ]`
    pub(super) fn connection(&mut self) -> Step {
        self.port_instance_id()?;
        self.expect(&[Operator::Arrow])?;
        self.port_instance_id()
    }

    fn port_instance_id(&mut self) -> Step {
        self.qualified_identifier()?;
        if self.accept(&[Operator::LeftBracket]).is_some() {
            self.expression()?;
            self.expect(&[Operator::RightBracket])?;
        }
        Ok(())
    }

    pub(super) fn event_specifier(&mut self) -> Step {
        let definition = self.define(TokenKind::Specifier, Modifiers::empty())?;
        if self.accept(&[Operator::LeftParen]).is_some() {
            self.param_list(definition.name.as_deref())?;
        }
        self.expect(&[Keyword::Severity])?;
        if self.accept(&[Keyword::Activity, Keyword::Warning]).is_some() {
            self.expect(&[Keyword::High, Keyword::Low])?;
        } else {
            self.expect(&[Keyword::Command, Keyword::Diagnostic, Keyword::Fatal])?;
        }
        if self.accept(&[Keyword::Id]).is_some() {
            self.expression()?;
        }
        self.expect(&[Keyword::Format])?;
        self.string()?;
        if self.accept(&[Keyword::Throttle]).is_some() {
            self.expression()?;
        }
        Ok(())
    }

    pub(super) fn include_specifier(&mut self) -> Step {
        self.string()
    }

    pub(super) fn init_specifier(&mut self) -> Step {
        self.expression()?;
        self.string()
    }

    pub(super) fn internal_port_specifier(&mut self) -> Step {
        self.expect(&[Keyword::Port])?;
        let definition = self.define(TokenKind::Specifier, Modifiers::empty())?;
        if self.accept(&[Operator::LeftParen]).is_some() {
            self.param_list(definition.name.as_deref())?;
        }
        if self.accept(&[Keyword::Priority]).is_some() {
            self.expression()?;
        }
        self.accept(&QUEUE_FULL);
        Ok(())
    }

    pub(super) fn locate_specifier(&mut self) -> Step {
        self.expect(&[
            Keyword::Instance,
            Keyword::Component,
            Keyword::Constant,
            Keyword::Port,
            Keyword::Topology,
            Keyword::Type,
        ])?;
        self.qualified_identifier()?;
        self.expect(&[Keyword::At])?;
        self.string()
    }

    pub(super) fn param_specifier(&mut self) -> Step {
        self.define(TokenKind::Specifier, Modifiers::empty())?;
        self.expect(&[Operator::Colon])?;
        self.type_name()?;
        for clause in [Keyword::Default, Keyword::Id] {
            if self.accept(&[clause]).is_some() {
                self.expression()?;
            }
        }
        for clause in [Keyword::Set, Keyword::Save] {
            if self.accept(&[clause]).is_some() {
                self.expect(&[Keyword::Opcode])?;
                self.expression()?;
            }
        }
        Ok(())
    }

    pub(super) fn port_instance_specifier(&mut self, kind: Keyword) -> Step {
        let general = match kind {
            Keyword::Async | Keyword::Guarded | Keyword::Sync => {
                self.expect(&[Keyword::Input])?;
                true
            }
            Keyword::Output => true,
            Keyword::Command => {
                self.expect(&[Keyword::Recv, Keyword::Reg, Keyword::Resp])?;
                false
            }
            Keyword::Param => {
                self.expect(&[Keyword::Get, Keyword::Set])?;
                false
            }
            Keyword::Text => {
                self.expect(&[Keyword::Event])?;
                false
            }
            Keyword::Time => {
                self.expect(&[Keyword::Get])?;
                false
            }
            _ => false,
        };
        self.expect(&[Keyword::Port])?;
        self.define(TokenKind::Port, async_modifier(kind))?;
        if !general {
            return Ok(());
        }

        self.expect(&[Operator::Colon])?;
        if self.accept(&[Operator::LeftBracket]).is_some() {
            self.expression()?;
            self.expect(&[Operator::RightBracket])?;
        }
        if self.accept(&[Keyword::Serial]).is_none() {
            self.qualified_identifier()?;
        }
        if self.accept(&[Keyword::Priority]).is_some() {
            self.expression()?;
        }
        if kind == Keyword::Async {
            self.accept(&QUEUE_FULL);
        }
        Ok(())
    }

    pub(super) fn match_specifier(&mut self) -> Step {
        self.identifier()?;
        self.expect(&[Keyword::With])?;
        self.identifier()
    }

    pub(super) fn telemetry_specifier(&mut self) -> Step {
        self.define(TokenKind::Specifier, Modifiers::empty())?;
        self.expect(&[Operator::Colon])?;
        self.type_name()?;
        if self.accept(&[Keyword::Id]).is_some() {
            self.expression()?;
        }
        if self.accept(&[Keyword::Update]).is_some()
            && self.expect(&[Keyword::Always, Keyword::On])? == Some(Keyword::On)
        {
            self.expect(&[Keyword::Change])?;
        }
        if self.accept(&[Keyword::Format]).is_some() {
            self.string()?;
        }
        for bound in [Keyword::Low, Keyword::High] {
            if self.accept(&[bound]).is_some()
                && self.expect(&[Operator::LeftBrace])?.is_some()
            {
                self.telemetry_limits()?;
            }
        }
        Ok(())
    }

    /// `(RED | ORANGE | YELLOW) expr`
    pub(super) fn telemetry_limit(&mut self) -> Step {
        self.expect(&[Keyword::Red, Keyword::Orange, Keyword::Yellow])?;
        self.expression()
    }

    pub(super) fn import_specifier(&mut self) -> Step {
        self.qualified_identifier()
    }
}
