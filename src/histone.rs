//! Main module for the histone template front end
//!
//! Source text flows through [lexing] (context-switching tokenizer built from a token
//! table) into [parsing] (recursive descent straight to the [ast]). The tree leaves the
//! crate through [formats]: the tagged-array wire form, the deparser, treeviz and
//! structural fingerprints.

pub mod ast;
pub mod config;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod token;

use std::fmt;

/// Any failure of the front end, from setup to rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoneError {
    Config(config::ConfigError),
    Parse(parsing::ParseError),
    Ast(ast::AstError),
    Format(formats::FormatError),
}

impl fmt::Display for HistoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoneError::Config(err) => write!(f, "Configuration error: {}", err),
            HistoneError::Parse(err) => write!(f, "Syntax error: {}", err),
            HistoneError::Ast(err) => write!(f, "Malformed AST: {}", err),
            HistoneError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for HistoneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoneError::Config(err) => Some(err),
            HistoneError::Parse(err) => Some(err),
            HistoneError::Ast(err) => Some(err),
            HistoneError::Format(err) => Some(err),
        }
    }
}

impl From<config::ConfigError> for HistoneError {
    fn from(err: config::ConfigError) -> Self {
        HistoneError::Config(err)
    }
}

impl From<parsing::ParseError> for HistoneError {
    fn from(err: parsing::ParseError) -> Self {
        HistoneError::Parse(err)
    }
}

impl From<ast::AstError> for HistoneError {
    fn from(err: ast::AstError) -> Self {
        HistoneError::Ast(err)
    }
}

impl From<formats::FormatError> for HistoneError {
    fn from(err: formats::FormatError) -> Self {
        HistoneError::Format(err)
    }
}
