//! Tokenizer
//!
//!     A stateful cursor over one input. Tokens are pulled lazily with one token of
//!     lookahead. Each pull runs the matcher of the current context forward from the scan
//!     offset:
//!
//!         - a match at the offset produces its token (or is skipped, for ignore-class
//!           definitions) and applies the definition's transition;
//!         - a match further ahead produces a fragment for the skipped text first, and the
//!           match waits in the pending queue until the next pull;
//!         - no match at all turns the rest of the input into one final fragment.
//!
//!     The tokenizer never fails on input. Text nothing recognises degrades to fragments and
//!     it is the parser's job to reject sequences that make no sense.

use crate::histone::config::ConfigError;
use crate::histone::lexing::factory::TokenizerFactory;
use crate::histone::lexing::table::TransitionRule;
use crate::histone::token::{Context, Token, TokenClass, TokenKind};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct PendingToken {
    token: Token,
    transition: TransitionRule,
}

/// Pull-based tokenizer bound to one input at a time.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    factory: &'a TokenizerFactory,
    input: &'a str,
    offset: usize,
    context: Context,
    nesting: u32,
    lookahead: Option<Token>,
    pending: VecDeque<PendingToken>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(
        factory: &'a TokenizerFactory,
        input: &'a str,
        start: Context,
    ) -> Result<Self, ConfigError> {
        factory.validate_start(start)?;
        Ok(Tokenizer {
            factory,
            input,
            offset: 0,
            context: start,
            nesting: 0,
            lookahead: None,
            pending: VecDeque::new(),
        })
    }

    /// Rebind to a new input, resetting the cursor, the lookahead, the pending queue, the
    /// nesting counter and the context.
    pub fn tokenize(&mut self, input: &'a str, start: Context) -> Result<(), ConfigError> {
        self.factory.validate_start(start)?;
        self.input = input;
        self.offset = 0;
        self.context = start;
        self.nesting = 0;
        self.lookahead = None;
        self.pending.clear();
        Ok(())
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// The context the next scan will use.
    pub fn context(&self) -> Context {
        self.context
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.lookahead.is_none() {
            let token = self.advance();
            self.lookahead = Some(token);
        }
        self.lookahead.get_or_insert_with(Token::eof)
    }

    /// Whether the next token has the given kind. Never advances.
    pub fn is_next(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.advance(),
        }
    }

    /// Consume the next token only if it has the given kind.
    pub fn next_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.is_next(kind) {
            Some(self.next_token())
        } else {
            None
        }
    }

    /// Drain every remaining token, EOF included.
    pub fn collect_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// 1-based line of a 1-based token offset; `None` means the end of the input.
    ///
    /// Counts line breaks backward from the offset, so it costs O(offset). Meant for error
    /// reporting only.
    pub fn line_at(&self, offset: Option<usize>) -> usize {
        let end = self.byte_end(offset);
        self.input.as_bytes()[..end]
            .iter()
            .rev()
            .filter(|byte| **byte == b'\n')
            .count()
            + 1
    }

    /// 1-based column (in characters) of a 1-based token offset.
    pub fn column_at(&self, offset: Option<usize>) -> usize {
        let end = self.byte_end(offset);
        let line_start = self.input.as_bytes()[..end]
            .iter()
            .rposition(|byte| *byte == b'\n')
            .map_or(0, |newline| newline + 1);
        self.input
            .get(line_start..end)
            .map_or(0, |text| text.chars().count())
            + 1
    }

    fn byte_end(&self, offset: Option<usize>) -> usize {
        offset
            .map_or(self.input.len(), |offset| offset.saturating_sub(1))
            .min(self.input.len())
    }

    fn apply(&mut self, transition: TransitionRule) {
        if let Some(context) = transition(&mut self.nesting) {
            self.context = context;
        }
    }

    fn advance(&mut self) -> Token {
        if let Some(pending) = self.pending.pop_front() {
            self.apply(pending.transition);
            return pending.token;
        }

        let factory = self.factory;
        loop {
            if self.offset >= self.input.len() {
                return Token::eof();
            }

            let found = factory
                .matcher(self.context)
                .and_then(|matcher| matcher.find_at(self.input, self.offset));

            let Some(found) = found else {
                let rest = Token::fragment(self.offset + 1, &self.input[self.offset..]);
                self.offset = self.input.len();
                return rest;
            };

            let definition = found.definition;
            if found.start > self.offset {
                let skipped =
                    Token::fragment(self.offset + 1, &self.input[self.offset..found.start]);
                self.offset = found.end;
                if definition.class == TokenClass::Ignore {
                    self.apply(definition.transition);
                } else {
                    self.pending.push_back(PendingToken {
                        token: Token::new(
                            definition.kind,
                            found.start + 1,
                            &self.input[found.start..found.end],
                        ),
                        transition: definition.transition,
                    });
                }
                return skipped;
            }

            self.offset = found.end;
            self.apply(definition.transition);
            if definition.class != TokenClass::Ignore {
                return Token::new(
                    definition.kind,
                    found.start + 1,
                    &self.input[found.start..found.end],
                );
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    /// Yields tokens up to, but not including, EOF.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}
