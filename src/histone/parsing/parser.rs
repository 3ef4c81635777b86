//! Recursive descent parser
//!
//!     The parser owns one [Tokenizer] for exactly one parse. The template loop collects
//!     items until the end of input or until a block opens with one of the caller's
//!     break-on tokens, which is how construct bodies end: `{{/if}}` stops the body of an
//!     if at the `/`, and the if parser then checks the rest of the close sequence.
//!
//!     Block constructs live in `blocks`, the expression grammar in `expression`.

use crate::histone::ast::{Item, Node};
use crate::histone::lexing::Tokenizer;
use crate::histone::parsing::error::{ParseError, ParseResult};
use crate::histone::token::{Token, TokenKind};

mod blocks;
mod expression;

pub struct Parser<'a> {
    tokens: Tokenizer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Tokenizer<'a>) -> Self {
        Parser { tokens }
    }

    /// Parse the whole input into a root sequence.
    pub fn parse(mut self) -> ParseResult<Vec<Item>> {
        self.parse_items(&[])
    }

    /// Parse a bare expression, for a tokenizer started in the block context. The
    /// expression may be followed by `}}`; nothing else may follow it.
    pub fn parse_expression(mut self) -> ParseResult<Node> {
        let node = self.expression()?;
        self.tokens.next_if(TokenKind::BlockClose);
        if !self.tokens.is_next(TokenKind::Eof) {
            return Err(self.error("\"}}\" or end of input"));
        }
        Ok(node)
    }

    /// Template loop. Stops at EOF, or right after a `{{` whose next token is in
    /// `break_on`; that token is left unconsumed.
    fn parse_items(&mut self, break_on: &[TokenKind]) -> ParseResult<Vec<Item>> {
        let mut items = Vec::new();
        loop {
            let kind = self.tokens.peek().kind;
            match kind {
                TokenKind::Eof => break,
                TokenKind::CommentOpen => self.skip_comment()?,
                TokenKind::LiteralOpen => items.push(Item::Text(self.literal_block()?)),
                TokenKind::BlockOpen => {
                    self.tokens.next_token();
                    if break_on.iter().any(|kind| self.tokens.is_next(*kind)) {
                        break;
                    }
                    if self.tokens.next_if(TokenKind::BlockClose).is_some() {
                        continue;
                    }
                    items.push(Item::Node(self.block()?));
                }
                TokenKind::BlockClose => {
                    self.tokens.next_token();
                }
                TokenKind::Fragment => {
                    let fragment = self.tokens.next_token();
                    items.push(Item::Text(fragment.text));
                }
                _ => return Err(self.error("template text or \"{{\"")),
            }
        }
        Ok(items)
    }

    /// Skip a comment, nested comments included.
    fn skip_comment(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::CommentOpen)?;
        let mut depth = 1usize;
        loop {
            let kind = self.tokens.peek().kind;
            match kind {
                TokenKind::Eof => return Err(self.error(TokenKind::CommentClose.describe())),
                TokenKind::CommentOpen => depth += 1,
                TokenKind::CommentClose => depth -= 1,
                _ => {}
            }
            self.tokens.next_token();
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Raw text of a `{{% ... %}}` block.
    fn literal_block(&mut self) -> ParseResult<String> {
        self.expect(TokenKind::LiteralOpen)?;
        let mut text = String::new();
        loop {
            let kind = self.tokens.peek().kind;
            match kind {
                TokenKind::Eof => return Err(self.error(TokenKind::LiteralClose.describe())),
                TokenKind::LiteralClose => {
                    self.tokens.next_token();
                    return Ok(text);
                }
                _ => text.push_str(&self.tokens.next_token().text),
            }
        }
    }

    /// Block content right after `{{`, dispatched on the leading keyword.
    fn block(&mut self) -> ParseResult<Node> {
        let kind = self.tokens.peek().kind;
        match kind {
            TokenKind::Var => self.var_block(),
            TokenKind::Macro => self.macro_block(),
            TokenKind::For => self.for_block(),
            TokenKind::If => self.if_block(),
            TokenKind::Call => self.call_block(),
            TokenKind::Import => self.import_block(),
            _ => {
                let node = self.expression()?;
                self.expect(TokenKind::BlockClose)?;
                Ok(node)
            }
        }
    }

    /// Build an error for the current lookahead.
    fn error(&mut self, expected: impl Into<String>) -> ParseError {
        let token = self.tokens.peek().clone();
        let line = self.tokens.line_at(token.offset);
        ParseError::new(line, expected, found_text(&token))
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        match self.tokens.next_if(kind) {
            Some(token) => Ok(token),
            None => Err(self.error(kind.describe())),
        }
    }

    /// A bound name: variable, loop variable, macro or parameter name.
    fn identifier(&mut self) -> ParseResult<String> {
        Ok(self.expect(TokenKind::Identifier)?.text)
    }

    /// The tail of a close sequence, `/ keyword }}`, after the break-on `{{`.
    fn expect_close(&mut self, keyword: TokenKind, name: &str) -> ParseResult<()> {
        for kind in [TokenKind::Slash, keyword, TokenKind::BlockClose] {
            if self.tokens.next_if(kind).is_none() {
                return Err(self.error(format!("\"{{{{/{}}}}}\"", name)));
            }
        }
        Ok(())
    }
}

fn found_text(token: &Token) -> String {
    if token.is_eof() {
        "end of input".to_string()
    } else {
        token.text.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histone::lexing::default_factory;
    use crate::histone::token::Context;

    fn parse(source: &str) -> ParseResult<Vec<Item>> {
        let tokens = default_factory()
            .tokenizer(source, Context::Template)
            .unwrap();
        Parser::new(tokens).parse()
    }

    #[test]
    fn test_text_only() {
        assert_eq!(parse("hello").unwrap(), vec![Item::text("hello")]);
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn test_empty_block_is_skipped() {
        assert_eq!(
            parse("a{{}}b").unwrap(),
            vec![Item::text("a"), Item::text("b")]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(
            parse("a{{* x {{* y *}} z *}}b").unwrap(),
            vec![Item::text("a"), Item::text("b")]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse("a{{* x").unwrap_err();
        assert_eq!(err.expected, "\"*}}\"");
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn test_literal_block_is_one_text_item() {
        assert_eq!(
            parse("{{% {{x}} %}}").unwrap(),
            vec![Item::text(" {{x}} ")]
        );
    }

    #[test]
    fn test_unterminated_literal_block() {
        let err = parse("{{% {{x}}").unwrap_err();
        assert_eq!(err.expected, "\"%}}\"");
    }

    fn parse_expression(source: &str) -> ParseResult<Node> {
        let tokens = default_factory().tokenizer(source, Context::Block).unwrap();
        Parser::new(tokens).parse_expression()
    }

    #[test]
    fn test_bare_expression() {
        let expected = Node::ternary(Node::name("a"), Node::name("b"), None);
        assert_eq!(parse_expression("a ? b").unwrap(), expected);
        assert_eq!(parse_expression("a ? b}}").unwrap(), expected);
    }

    #[test]
    fn test_bare_expression_rejects_trailing_input() {
        let err = parse_expression("a b").unwrap_err();
        assert_eq!(err.expected, "\"}}\" or end of input");
        assert_eq!(err.found, "b");
        assert!(parse_expression("a}} tail").is_err());
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse("a\nb\n{{ 1 @ }}").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.expected, "\"}}\"");
        assert_eq!(err.found, "@");
    }
}
