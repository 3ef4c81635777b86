//! Token types shared by the tokenizer, the parser and tooling.
//!
//!     A token is a classified slice of the template source: its kind, the 1-based offset
//!     where it starts and the raw text it covers. Text the token table does not
//!     recognise is still tokenized, as a [TokenKind::Fragment], so every byte of the
//!     source ends up in exactly one token.
//!
//! Contexts
//!
//!     The lexer is modal. Which definitions are eligible depends on the current
//!     [Context]: plain template text, the inside of a `{{ ... }}` block, a comment or a
//!     literal block. Definitions switch the context through their transition rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexer mode selecting which token definitions are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Context {
    /// Raw template text between blocks
    Template,
    /// Inside `{{ ... }}`
    Block,
    /// Inside `{{* ... *}}`, possibly nested
    Comment,
    /// Inside `{{% ... %}}`, content is not interpreted
    Literal,
}

impl Context {
    pub const ALL: [Context; 4] = [
        Context::Template,
        Context::Block,
        Context::Comment,
        Context::Literal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Context::Template => "template",
            Context::Block => "block",
            Context::Comment => "comment",
            Context::Literal => "literal",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the tokenizer treats a definition once it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenClass {
    /// Emitted as a token
    Normal,
    /// Emitted as a token whose text carries a value (numbers, strings, names)
    Literal,
    /// Consumed silently (whitespace inside blocks)
    Ignore,
}

/// All token kinds of the histone template language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    // Synthetic
    Fragment,
    Eof,

    // Delimiters
    CommentOpen,
    CommentClose,
    LiteralOpen,
    LiteralClose,
    BlockOpen,
    BlockClose,
    Whitespace,

    // Keywords
    Var,
    Macro,
    For,
    In,
    If,
    ElseIf,
    Else,
    Call,
    Import,
    Null,
    True,
    False,
    This,
    #[serde(rename = "self")]
    SelfRef,
    Global,

    // Operators. Word and symbol spellings share a kind (`or` and `||` are both Or)
    Or,
    And,
    Not,
    Equal,
    NotEqual,
    LessOrEqual,
    LessThan,
    GreaterOrEqual,
    GreaterThan,
    Plus,
    Minus,
    Star,
    /// `/`: division inside expressions, the close marker right after `{{`
    Slash,
    Mod,

    // Punctuation
    Question,
    Colon,
    Comma,
    Dot,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Assign,

    // Values
    Int,
    Double,
    String,
    Identifier,
}

impl TokenKind {
    /// Tokens that can name a property after `.` or a bound variable.
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Var
                | TokenKind::Macro
                | TokenKind::For
                | TokenKind::In
                | TokenKind::If
                | TokenKind::ElseIf
                | TokenKind::Else
                | TokenKind::Call
                | TokenKind::Import
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::This
                | TokenKind::SelfRef
                | TokenKind::Global
        )
    }

    /// Human readable description used in syntax errors.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Fragment => "template text",
            TokenKind::Eof => "end of input",
            TokenKind::CommentOpen => "\"{{*\"",
            TokenKind::CommentClose => "\"*}}\"",
            TokenKind::LiteralOpen => "\"{{%\"",
            TokenKind::LiteralClose => "\"%}}\"",
            TokenKind::BlockOpen => "\"{{\"",
            TokenKind::BlockClose => "\"}}\"",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Var => "\"var\"",
            TokenKind::Macro => "\"macro\"",
            TokenKind::For => "\"for\"",
            TokenKind::In => "\"in\"",
            TokenKind::If => "\"if\"",
            TokenKind::ElseIf => "\"elseif\"",
            TokenKind::Else => "\"else\"",
            TokenKind::Call => "\"call\"",
            TokenKind::Import => "\"import\"",
            TokenKind::Null => "\"null\"",
            TokenKind::True => "\"true\"",
            TokenKind::False => "\"false\"",
            TokenKind::This => "\"this\"",
            TokenKind::SelfRef => "\"self\"",
            TokenKind::Global => "\"global\"",
            TokenKind::Or => "\"or\"",
            TokenKind::And => "\"and\"",
            TokenKind::Not => "\"not\"",
            TokenKind::Equal => "\"is\"",
            TokenKind::NotEqual => "\"isNot\"",
            TokenKind::LessOrEqual => "\"<=\"",
            TokenKind::LessThan => "\"<\"",
            TokenKind::GreaterOrEqual => "\">=\"",
            TokenKind::GreaterThan => "\">\"",
            TokenKind::Plus => "\"+\"",
            TokenKind::Minus => "\"-\"",
            TokenKind::Star => "\"*\"",
            TokenKind::Slash => "\"/\"",
            TokenKind::Mod => "\"mod\"",
            TokenKind::Question => "\"?\"",
            TokenKind::Colon => "\":\"",
            TokenKind::Comma => "\",\"",
            TokenKind::Dot => "\".\"",
            TokenKind::LeftParen => "\"(\"",
            TokenKind::RightParen => "\")\"",
            TokenKind::LeftBracket => "\"[\"",
            TokenKind::RightBracket => "\"]\"",
            TokenKind::Assign => "\"=\"",
            TokenKind::Int => "integer",
            TokenKind::Double => "decimal",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
        }
    }
}

/// A lexeme produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based byte offset of the first character; `None` for the EOF sentinel
    pub offset: Option<usize>,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize, text: impl Into<String>) -> Self {
        Token {
            kind,
            offset: Some(offset),
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Token {
            kind: TokenKind::Eof,
            offset: None,
            text: String::new(),
        }
    }

    pub fn fragment(offset: usize, text: impl Into<String>) -> Self {
        Token::new(TokenKind::Fragment, offset, text)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{:?}@{} {:?}", self.kind, offset, self.text),
            None => write!(f, "{:?}@-1", self.kind),
        }
    }
}
