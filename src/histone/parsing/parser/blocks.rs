//! Block constructs: var, macro, for, if, call and import.
//!
//! Each parser is entered with the construct keyword as lookahead, right after the
//! opening `{{`. Bodies are parsed with the template loop and end at a break-on token;
//! the close sequence `{{/keyword}}` is checked by token kind only.

use super::Parser;
use crate::histone::ast::{IfArm, Node, Segment};
use crate::histone::parsing::error::ParseResult;
use crate::histone::token::TokenKind;

impl<'a> Parser<'a> {
    /// `{{import "path"}}`
    pub(super) fn import_block(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Import)?;
        let path = self.expect(TokenKind::String)?;
        self.expect(TokenKind::BlockClose)?;
        Ok(Node::Import(super::expression::unquote(&path.text)))
    }

    /// `{{var name = expr}}` or `{{var name}}body{{/var}}`
    pub(super) fn var_block(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Var)?;
        let name = self.identifier()?;

        if self.tokens.next_if(TokenKind::Assign).is_some() {
            let value = self.expression()?;
            self.expect(TokenKind::BlockClose)?;
            return Ok(Node::var(name, value));
        }
        if self.tokens.next_if(TokenKind::BlockClose).is_none() {
            return Err(self.error("\"=\" or \"}}\""));
        }
        let body = self.parse_items(&[TokenKind::Slash])?;
        self.expect_close(TokenKind::Var, "var")?;
        Ok(Node::var(name, Node::Statements(body)))
    }

    /// `{{macro name(p1, p2)}}body{{/macro}}`
    pub(super) fn macro_block(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Macro)?;
        let name = self.identifier()?;

        let mut params = Vec::new();
        if self.tokens.next_if(TokenKind::LeftParen).is_some()
            && self.tokens.next_if(TokenKind::RightParen).is_none()
        {
            loop {
                params.push(self.identifier()?);
                if self.tokens.next_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RightParen)?;
        }
        self.expect(TokenKind::BlockClose)?;

        let body = self.parse_items(&[TokenKind::Slash])?;
        self.expect_close(TokenKind::Macro, "macro")?;
        Ok(Node::Macro { name, params, body })
    }

    /// `{{for v in expr}}` or `{{for k : v in expr}}`, an optional `{{else}}` arm, then
    /// `{{/for}}`.
    pub(super) fn for_block(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::For)?;
        let mut names = vec![self.identifier()?];
        if self.tokens.next_if(TokenKind::Colon).is_some() {
            names.push(self.identifier()?);
        }
        self.expect(TokenKind::In)?;
        let collection = self.expression()?;
        self.expect(TokenKind::BlockClose)?;

        let body = self.parse_items(&[TokenKind::Slash, TokenKind::Else])?;
        let otherwise = if self.tokens.next_if(TokenKind::Else).is_some() {
            self.expect(TokenKind::BlockClose)?;
            Some(self.parse_items(&[TokenKind::Slash])?)
        } else {
            None
        };
        self.expect_close(TokenKind::For, "for")?;

        Ok(Node::For {
            names,
            collection: Box::new(collection),
            body,
            otherwise,
        })
    }

    /// `{{if c}}...{{elseif c}}...{{else}}...{{/if}}`. The else arm is stored with a
    /// constant true condition.
    pub(super) fn if_block(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::If)?;
        let mut arms = Vec::new();
        loop {
            let condition = self.expression()?;
            self.expect(TokenKind::BlockClose)?;
            let body =
                self.parse_items(&[TokenKind::Slash, TokenKind::ElseIf, TokenKind::Else])?;
            arms.push(IfArm { condition, body });
            if self.tokens.next_if(TokenKind::ElseIf).is_none() {
                break;
            }
        }
        if self.tokens.next_if(TokenKind::Else).is_some() {
            self.expect(TokenKind::BlockClose)?;
            let body = self.parse_items(&[TokenKind::Slash])?;
            arms.push(IfArm {
                condition: Node::True,
                body,
            });
        }
        self.expect_close(TokenKind::If, "if")?;
        Ok(Node::If(arms))
    }

    /// `{{call name(args)}}body{{/call}}`. The body becomes the last argument.
    pub(super) fn call_block(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Call)?;
        let name = self.identifier()?;
        let mut args = if self.tokens.next_if(TokenKind::LeftParen).is_some() {
            self.arguments()?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::BlockClose)?;

        let body = self.parse_items(&[TokenKind::Slash])?;
        self.expect_close(TokenKind::Call, "call")?;
        args.push(Node::Statements(body));
        Ok(Node::call(None, Segment::Name(name), args))
    }
}
