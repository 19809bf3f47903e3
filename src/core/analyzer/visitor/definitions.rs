//! Definition visitors.
//!
//! Productions, entered with the cursor on the leading keyword:
//! - `array`     := ARRAY ident `=` `[` expr `]` type [DEFAULT expr] [FORMAT string]
//! - `component` := (ACTIVE | PASSIVE | QUEUED) COMPONENT ident `{` component-member* `}`
//! - `constant`  := CONSTANT ident `=` expr
//! - `instance`  := INSTANCE ident `:` qual-ident BASE ID expr [AT string]
//!   [QUEUE SIZE expr] [STACK SIZE expr] [PRIORITY expr] [CPU expr] [`{` init-spec* `}`]
//! - `enum`      := ENUM ident [`:` type] `{` enum-constant* `}` [DEFAULT expr]
//! - `module`    := MODULE ident `{` module-member* `}`
//! - `port`      := PORT ident [`(` param-list `)`] [`->` type]
//! - `struct`    := STRUCT ident `{` struct-member* `}` [DEFAULT expr]
//! - `type`      := TYPE ident [`=` type]
//! - `topology`  := TOPOLOGY ident `{` topology-member* `}`
//!
//! Scopes pushed by a definition are closed even when its body is abandoned.

use super::{Block, GrammarVisitor, Step};
use crate::core::scanner::{Keyword, Modifiers, Operator, TokenKind};

impl GrammarVisitor<'_> {
    pub(super) fn array_definition(&mut self) -> Step {
        self.define(TokenKind::Variable, Modifiers::empty())?;
        self.expect(&[Operator::Equals])?;
        self.expect(&[Operator::LeftBracket])?;
        self.expression()?;
        self.expect(&[Operator::RightBracket])?;
        self.type_name()?;
        if self.accept(&[Keyword::Default]).is_some() {
            self.expression()?;
        }
        if self.accept(&[Keyword::Format]).is_some() {
            self.string()?;
        }
        Ok(())
    }

    pub(super) fn component_definition(&mut self) -> Step {
        self.expect(&[Keyword::Component])?;
        let definition = self.define(TokenKind::Component, Modifiers::empty())?;
        let body = self.braced_members(Block::Component);
        self.close_scope(definition.opened);
        body
    }

    pub(super) fn constant_definition(&mut self) -> Step {
        self.define(TokenKind::Variable, Modifiers::empty())?;
        self.expect(&[Operator::Equals])?;
        self.expression()
    }

    pub(super) fn instance_definition(&mut self) -> Step {
        let definition = self.define(TokenKind::Instance, Modifiers::empty())?;
        let body = self.instance_body();
        self.close_scope(definition.opened);
        body
    }

    fn instance_body(&mut self) -> Step {
        self.expect(&[Operator::Colon])?;
        self.qualified_identifier()?;
        self.expect(&[Keyword::Base])?;
        self.expect(&[Keyword::Id])?;
        self.expression()?;
        if self.accept(&[Keyword::At]).is_some() {
            self.string()?;
        }
        for sized in [Keyword::Queue, Keyword::Stack] {
            if self.accept(&[sized]).is_some() {
                self.expect(&[Keyword::Size])?;
                self.expression()?;
            }
        }
        for clause in [Keyword::Priority, Keyword::Cpu] {
            if self.accept(&[clause]).is_some() {
                self.expression()?;
            }
        }
        if self.accept(&[Operator::LeftBrace]).is_some() {
            self.init_specifiers()?;
        }
        Ok(())
    }

    pub(super) fn enum_definition(&mut self) -> Step {
        let definition = self.define(TokenKind::Enum, Modifiers::empty())?;
        let body = self.enum_body();
        self.close_scope(definition.opened);
        body?;
        if self.accept(&[Keyword::Default]).is_some() {
            self.expression()?;
        }
        Ok(())
    }

    fn enum_body(&mut self) -> Step {
        if self.accept(&[Operator::Colon]).is_some() {
            self.type_name()?;
        }
        if self.expect(&[Operator::LeftBrace])?.is_some() {
            self.enum_constants()?;
        }
        Ok(())
    }

    pub(super) fn module_definition(&mut self) -> Step {
        let definition = self.define(TokenKind::Namespace, Modifiers::empty())?;
        let body = self.braced_members(Block::Module);
        self.close_scope(definition.opened);
        body
    }

    pub(super) fn port_definition(&mut self) -> Step {
        let definition = self.define(TokenKind::Port, Modifiers::empty())?;
        if self.accept(&[Operator::LeftParen]).is_some() {
            self.param_list(definition.name.as_deref())?;
        }
        if self.accept(&[Operator::Arrow]).is_some() {
            self.type_name()?;
        }
        Ok(())
    }

    pub(super) fn struct_definition(&mut self) -> Step {
        let definition = self.define(TokenKind::Struct, Modifiers::empty())?;
        let body = match self.expect(&[Operator::LeftBrace]) {
            Ok(Some(_)) => self.struct_members(),
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        self.close_scope(definition.opened);
        body?;
        if self.accept(&[Keyword::Default]).is_some() {
            self.expression()?;
        }
        Ok(())
    }

    /// `ident : [ [ expr ] ] type [FORMAT string]`
    pub(super) fn struct_member(&mut self) -> Step {
        self.define(TokenKind::Variable, Modifiers::empty())?;
        self.expect(&[Operator::Colon])?;
        if self.accept(&[Operator::LeftBracket]).is_some() {
            self.expression()?;
            self.expect(&[Operator::RightBracket])?;
        }
        self.type_name()?;
        if self.accept(&[Keyword::Format]).is_some() {
            self.string()?;
        }
        Ok(())
    }

    /// `ident [= expr]`
    pub(super) fn enum_constant(&mut self) -> Step {
        self.define(TokenKind::EnumMember, Modifiers::READONLY)?;
        if self.accept(&[Operator::Equals]).is_some() {
            self.expression()?;
        }
        Ok(())
    }

    /// Abstract types declare a type parameter; `= type` makes an alias.
    pub(super) fn type_definition(&mut self) -> Step {
        self.define(TokenKind::TypeParam, Modifiers::ABSTRACT)?;
        if self.accept(&[Operator::Equals]).is_some() {
            self.type_name()?;
        }
        Ok(())
    }

    pub(super) fn topology_definition(&mut self) -> Step {
        let definition = self.define(TokenKind::Topology, Modifiers::empty())?;
        let body = self.braced_members(Block::Topology);
        self.close_scope(definition.opened);
        body
    }

    /// `{ member* }` for blocks whose members are statements.
    fn braced_members(&mut self, block: Block) -> Step {
        if self.expect(&[Operator::LeftBrace])?.is_some() {
            self.member_sequence(block)?;
        }
        Ok(())
    }
}
