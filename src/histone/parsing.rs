//! Parsing
//!
//!     Turns template source into an AST in one pass over the token stream:
//!
//!         1. Lexing. The default (or a configured) [TokenizerFactory] hands out a
//!            tokenizer bound to the source. See [lexing](crate::histone::lexing).
//!         2. Parsing. A [Parser] pulls tokens on demand and builds [Item]s directly.
//!            There is no intermediate representation.
//!
//!     The first syntax error aborts the parse. Errors carry the line of the offending
//!     token, what was expected and what was found; [format_source_context] renders the
//!     surrounding source lines for reports.

pub mod error;
pub mod parser;

pub use error::{format_source_context, ParseError, ParseResult};
pub use parser::Parser;

use crate::histone::ast::{Item, Node, Template};
use crate::histone::lexing::{default_factory, TokenizerFactory};
use crate::histone::token::Context;
use crate::histone::HistoneError;

/// Parse `source` with the given factory, starting in the template context.
pub fn parse(factory: &TokenizerFactory, source: &str) -> Result<Vec<Item>, HistoneError> {
    parse_from(factory, source, Context::Template)
}

/// Parse `source` as a template starting in an arbitrary context. The template loop only
/// accepts template-level tokens, so a start in [Context::Block] suits sources that open
/// inside a block's tail, such as `}}text`; bare expressions go through
/// [parse_expression].
pub fn parse_from(
    factory: &TokenizerFactory,
    source: &str,
    start: Context,
) -> Result<Vec<Item>, HistoneError> {
    let tokens = factory.tokenizer(source, start)?;
    Ok(Parser::new(tokens).parse()?)
}

/// Parse a bare expression such as `a ? b`, optionally followed by `}}`. Scanning starts
/// in [Context::Block].
pub fn parse_expression(factory: &TokenizerFactory, source: &str) -> Result<Node, HistoneError> {
    let tokens = factory.tokenizer(source, Context::Block)?;
    Ok(Parser::new(tokens).parse_expression()?)
}

/// Parse a template with the embedded default token table.
pub fn parse_template(source: &str) -> Result<Template, HistoneError> {
    parse(default_factory(), source).map(Template::new)
}
