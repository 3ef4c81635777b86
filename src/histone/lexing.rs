//! Lexer
//!
//!     Histone templates are lexed by a table-driven, context-switching tokenizer. The
//!     pipeline has three pieces:
//!
//!         1. The token table. See [table]. An ordered list of definitions, loaded from
//!            configuration, each tied to one context.
//!         2. The tokenizer factory. See [factory]. Compiles the table into one combined
//!            matcher per context, once, at setup.
//!         3. The tokenizer. See [tokenizer]. A cursor over one input that pulls tokens on
//!            demand and switches context as definitions fire.
//!
//! Contexts
//!
//!     Template text is mostly opaque. Only the block delimiters matter there, everything
//!     else is a fragment that ends up verbatim in the AST. Inside `{{ ... }}` the
//!     expression vocabulary applies. Comments and literal blocks have their own contexts
//!     so their content is never mistaken for blocks.

pub mod factory;
pub mod table;
pub mod tokenizer;

pub use factory::{ContextMatcher, TokenizerFactory};
pub use table::{TokenDef, TokenSpec, TokenTable, TransitionRule};
pub use tokenizer::Tokenizer;

use crate::histone::config::ConfigError;
use crate::histone::token::{Context, Token};
use once_cell::sync::Lazy;

static DEFAULT_FACTORY: Lazy<TokenizerFactory> = Lazy::new(|| {
    TokenizerFactory::with_defaults().expect("embedded default token table is valid")
});

/// Factory compiled from the embedded default token table.
pub fn default_factory() -> &'static TokenizerFactory {
    &DEFAULT_FACTORY
}

/// Tokenize a whole input with the default table. The result ends with the EOF token.
pub fn tokenize_all(source: &str, start: Context) -> Result<Vec<Token>, ConfigError> {
    let mut tokenizer = default_factory().tokenizer(source, start)?;
    Ok(tokenizer.collect_tokens())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histone::token::TokenKind;

    #[test]
    fn test_default_table_covers_all_contexts() {
        let contexts: Vec<Context> = default_factory().contexts().collect();
        assert_eq!(contexts, Context::ALL.to_vec());
    }

    #[test]
    fn test_tokenize_block() {
        let tokens = tokenize_all("{{var x = 'a'}}", Context::Template).unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::BlockOpen,
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::String,
                TokenKind::BlockClose,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[4].text, "'a'");
    }

    #[test]
    fn test_operator_spellings_share_kinds() {
        let tokens = tokenize_all("or || and && not ! mod % is == isNot !=", Context::Block).unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Or,
                TokenKind::Or,
                TokenKind::And,
                TokenKind::And,
                TokenKind::Not,
                TokenKind::Not,
                TokenKind::Mod,
                TokenKind::Mod,
                TokenKind::Equal,
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::NotEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_and_strings() {
        let tokens = tokenize_all(r#"12 3.50 "a\"b" 'c'"#, Context::Block).unwrap();
        let pairs: Vec<(TokenKind, &str)> =
            tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (TokenKind::Int, "12"),
                (TokenKind::Double, "3.50"),
                (TokenKind::String, r#""a\"b""#),
                (TokenKind::String, "'c'"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_undefined_start_context() {
        let empty = TokenizerFactory::new(&TokenTable::default()).unwrap();
        assert_eq!(empty.contexts().count(), 0);
        let err = empty.validate_start(Context::Block).unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedContext(Context::Block)));
    }
}
