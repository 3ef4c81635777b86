//! Expression grammar, lowest precedence first:
//!
//!     ternary        or ("?" ternary (":" ternary)?)?
//!     or             and (("or" | "||") and)*
//!     and            equality (("and" | "&&") equality)*
//!     equality       relational (("is" | "==" | "isNot" | "!=") relational)*
//!     relational     additive (("<=" | "<" | ">=" | ">") additive)*
//!     additive       multiplicative (("+" | "-") multiplicative)*
//!     multiplicative unary (("*" | "/" | "mod" | "%") unary)*
//!     unary          ("not" | "!") unary | "+" unary | primary
//!     primary        "-"? simple ("." word | "[" expr "]" | "(" args ")")*
//!     simple         literal | map | name | "(" expr ")"
//!
//! A prefix minus applies to the whole postfix chain: `-x.y` negates `x.y`.

use super::Parser;
use crate::histone::ast::{BinaryOp, Decimal, MapEntry, Node, Segment, UnaryOp};
use crate::histone::parsing::error::ParseResult;
use crate::histone::token::TokenKind;
use num_bigint::BigInt;
use std::str::FromStr;

const EQUALITY: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Equal, BinaryOp::Equal),
    (TokenKind::NotEqual, BinaryOp::NotEqual),
];

const RELATIONAL: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::LessOrEqual, BinaryOp::LessOrEqual),
    (TokenKind::LessThan, BinaryOp::LessThan),
    (TokenKind::GreaterOrEqual, BinaryOp::GreaterOrEqual),
    (TokenKind::GreaterThan, BinaryOp::GreaterThan),
];

const ADDITIVE: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];

const MULTIPLICATIVE: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Mod, BinaryOp::Mod),
];

impl<'a> Parser<'a> {
    pub(super) fn expression(&mut self) -> ParseResult<Node> {
        self.ternary()
    }

    fn ternary(&mut self) -> ParseResult<Node> {
        let condition = self.or()?;
        if self.tokens.next_if(TokenKind::Question).is_none() {
            return Ok(condition);
        }
        let then = self.ternary()?;
        let otherwise = if self.tokens.next_if(TokenKind::Colon).is_some() {
            Some(self.ternary()?)
        } else {
            None
        };
        Ok(Node::ternary(condition, then, otherwise))
    }

    fn or(&mut self) -> ParseResult<Node> {
        let mut left = self.and()?;
        while self.tokens.next_if(TokenKind::Or).is_some() {
            let right = self.and()?;
            left = Node::binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn and(&mut self) -> ParseResult<Node> {
        let mut left = self.binary_level(EQUALITY, Self::equality_operand)?;
        while self.tokens.next_if(TokenKind::And).is_some() {
            let right = self.binary_level(EQUALITY, Self::equality_operand)?;
            left = Node::binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn equality_operand(&mut self) -> ParseResult<Node> {
        self.binary_level(RELATIONAL, Self::relational_operand)
    }

    fn relational_operand(&mut self) -> ParseResult<Node> {
        self.binary_level(ADDITIVE, Self::additive_operand)
    }

    fn additive_operand(&mut self) -> ParseResult<Node> {
        self.binary_level(MULTIPLICATIVE, Self::unary)
    }

    /// One left-associative precedence level.
    fn binary_level(
        &mut self,
        operators: &[(TokenKind, BinaryOp)],
        operand: fn(&mut Self) -> ParseResult<Node>,
    ) -> ParseResult<Node> {
        let mut left = operand(self)?;
        'level: loop {
            for (kind, op) in operators {
                if self.tokens.next_if(*kind).is_some() {
                    let right = operand(self)?;
                    left = Node::binary(*op, left, right);
                    continue 'level;
                }
            }
            return Ok(left);
        }
    }

    fn unary(&mut self) -> ParseResult<Node> {
        if self.tokens.next_if(TokenKind::Not).is_some() {
            let operand = self.unary()?;
            return Ok(Node::unary(UnaryOp::Not, operand));
        }
        if self.tokens.next_if(TokenKind::Plus).is_some() {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Node> {
        let negate = self.tokens.next_if(TokenKind::Minus).is_some();
        let mut node = self.simple()?;

        loop {
            if self.tokens.next_if(TokenKind::Dot).is_some() {
                let name = self.property_name()?;
                node = node.push_segment(Segment::Name(name));
            } else if self.tokens.next_if(TokenKind::LeftBracket).is_some() {
                if self.tokens.is_next(TokenKind::RightBracket) {
                    return Err(self.error("index expression"));
                }
                let index = self.expression()?;
                self.expect(TokenKind::RightBracket)?;
                node = node.push_segment(Segment::expr(index));
            } else if self.tokens.is_next(TokenKind::LeftParen) {
                node = self.call(node)?;
            } else {
                break;
            }
        }

        if negate {
            node = Node::unary(UnaryOp::Negate, node);
        }
        Ok(node)
    }

    /// `(args)` after a selector: the last segment names the function, the rest of the
    /// path, if any, is the call target.
    fn call(&mut self, callee: Node) -> ParseResult<Node> {
        let Node::Selector(mut path) = callee else {
            return Err(self.error("a selector before \"(\""));
        };
        let Some(name) = path.pop() else {
            return Err(self.error("a selector before \"(\""));
        };
        self.expect(TokenKind::LeftParen)?;
        let args = self.arguments()?;
        let target = if path.is_empty() {
            None
        } else {
            Some(Node::Selector(path))
        };
        Ok(Node::call(target, name, args))
    }

    /// Comma separated arguments up to and including `)`. The `(` is already consumed.
    pub(super) fn arguments(&mut self) -> ParseResult<Vec<Node>> {
        let mut args = Vec::new();
        if self.tokens.next_if(TokenKind::RightParen).is_some() {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.tokens.next_if(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(args)
    }

    /// A property name after `.`. Keywords are valid property names.
    fn property_name(&mut self) -> ParseResult<String> {
        if self.tokens.peek().kind.is_word() {
            Ok(self.tokens.next_token().text)
        } else {
            Err(self.error("property name"))
        }
    }

    fn simple(&mut self) -> ParseResult<Node> {
        let kind = self.tokens.peek().kind;
        let node = match kind {
            TokenKind::Null => Node::Null,
            TokenKind::True => Node::True,
            TokenKind::False => Node::False,
            TokenKind::Int => {
                let text = &self.tokens.peek().text;
                match BigInt::from_str(text) {
                    Ok(value) => Node::Int(value),
                    Err(_) => return Err(self.error(TokenKind::Int.describe())),
                }
            }
            TokenKind::Double => {
                let text = &self.tokens.peek().text;
                match Decimal::from_str(text) {
                    Ok(value) => Node::Double(value),
                    Err(_) => return Err(self.error(TokenKind::Double.describe())),
                }
            }
            TokenKind::String => Node::String(unquote(&self.tokens.peek().text)),
            TokenKind::Identifier | TokenKind::This | TokenKind::SelfRef | TokenKind::Global => {
                Node::name(self.tokens.peek().text.clone())
            }
            TokenKind::LeftBracket => {
                self.tokens.next_token();
                return self.map_literal();
            }
            TokenKind::LeftParen => {
                self.tokens.next_token();
                let inner = self.expression()?;
                self.expect(TokenKind::RightParen)?;
                return Ok(inner);
            }
            _ => return Err(self.error("expression")),
        };
        self.tokens.next_token();
        Ok(node)
    }

    /// `[key: value, value, ...]` after the `[`.
    fn map_literal(&mut self) -> ParseResult<Node> {
        let mut entries = Vec::new();
        if self.tokens.next_if(TokenKind::RightBracket).is_some() {
            return Ok(Node::Map(entries));
        }
        loop {
            let first = self.expression()?;
            let entry = if self.tokens.is_next(TokenKind::Colon) {
                let key = self.map_key(first)?;
                self.tokens.next_token();
                MapEntry {
                    key: Some(key),
                    value: self.expression()?,
                }
            } else {
                MapEntry {
                    key: None,
                    value: first,
                }
            };
            entries.push(entry);
            if self.tokens.next_if(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightBracket)?;
        Ok(Node::Map(entries))
    }

    /// Keys are strings, integers (kept as their text) or bare names.
    fn map_key(&mut self, key: Node) -> ParseResult<String> {
        match key {
            Node::String(text) => Ok(text),
            Node::Int(value) => Ok(value.to_string()),
            Node::Selector(mut path) if path.len() == 1 => match path.pop() {
                Some(Segment::Name(name)) => Ok(name),
                _ => Err(self.error("string, integer or name as map key")),
            },
            _ => Err(self.error("string, integer or name as map key")),
        }
    }
}

/// Strip the quotes of a string token and resolve its escapes.
pub(super) fn unquote(raw: &str) -> String {
    let mut chars = raw.chars();
    let quote = chars.next();
    let inner = chars.as_str();
    let inner = match (quote, inner.strip_suffix(|c: char| Some(c) == quote)) {
        (Some('"' | '\''), Some(inner)) => inner,
        _ => return raw.to_string(),
    };

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some('r') => text.push('\r'),
            Some('b') => text.push('\u{8}'),
            Some('f') => text.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        text.push(decoded);
                        chars.nth(3);
                    }
                    _ => text.push('u'),
                }
            }
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }
    text
}
