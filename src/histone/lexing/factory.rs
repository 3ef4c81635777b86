//! Tokenizer factory
//!
//!     Compiles a [TokenTable] into one matcher per context. Every definition of a context
//!     becomes one parenthesized alternative of a single regular expression, in
//!     registration order, so one scan both finds the next lexeme and tells which
//!     definition produced it. The regex crate uses leftmost-first semantics for
//!     alternations, so registration order breaks ties at a given position.
//!
//!     Definition patterns may contain capture groups of their own. The group index of
//!     each definition's outer group is computed from the group counts of the definitions
//!     before it.

use crate::histone::config::{ConfigError, HistoneConfig};
use crate::histone::lexing::table::{TokenDef, TokenTable};
use crate::histone::lexing::tokenizer::Tokenizer;
use crate::histone::token::Context;
use regex::Regex;
use std::collections::BTreeMap;

/// A match found by a [ContextMatcher].
#[derive(Debug, Clone, Copy)]
pub struct Found<'m> {
    /// Byte offset where the match starts
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
    pub definition: &'m TokenDef,
}

/// The compiled alternation of one context.
#[derive(Debug, Clone)]
pub struct ContextMatcher {
    context: Context,
    regex: Regex,
    /// Each definition's pattern on its own, for retries after an empty match
    singles: Vec<Regex>,
    definitions: Vec<TokenDef>,
    groups: Vec<usize>,
}

impl ContextMatcher {
    fn compile(context: Context, definitions: Vec<TokenDef>) -> Result<Self, ConfigError> {
        let mut groups = Vec::with_capacity(definitions.len());
        let mut alternatives = Vec::with_capacity(definitions.len());
        let mut singles = Vec::with_capacity(definitions.len());
        let mut next_group = 1;

        for def in &definitions {
            let single = Regex::new(&def.pattern).map_err(|e| ConfigError::InvalidPattern {
                kind: def.kind,
                pattern: def.pattern.clone(),
                message: e.to_string(),
            })?;
            groups.push(next_group);
            next_group += single.captures_len();
            alternatives.push(format!("({})", def.pattern));
            singles.push(single);
        }

        let combined = alternatives.join("|");
        let regex = Regex::new(&combined).map_err(|e| ConfigError::InvalidPattern {
            kind: definitions[0].kind,
            pattern: combined.clone(),
            message: e.to_string(),
        })?;

        Ok(ContextMatcher {
            context,
            regex,
            singles,
            definitions,
            groups,
        })
    }

    pub fn context(&self) -> Context {
        self.context
    }

    /// The combined alternation pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn definitions(&self) -> &[TokenDef] {
        &self.definitions
    }

    /// Find the first non-empty match at or after `offset`.
    ///
    /// When the winning definition matches the empty string, the definitions registered
    /// after it get their turn at the same position; only if none of them matches
    /// non-empty there does the search resume one character further. A definition that
    /// can match the empty string therefore never stalls the tokenizer.
    pub fn find_at(&self, input: &str, offset: usize) -> Option<Found<'_>> {
        let mut from = offset;
        loop {
            let captures = self.regex.captures_at(input, from)?;
            let whole = captures.get(0)?;
            let index = self
                .groups
                .iter()
                .position(|group| captures.get(*group).is_some())?;
            if !whole.is_empty() {
                return Some(Found {
                    start: whole.start(),
                    end: whole.end(),
                    definition: &self.definitions[index],
                });
            }
            if let Some(found) = self.find_after_empty(input, whole.start(), index) {
                return Some(found);
            }
            let step = input[whole.start()..].chars().next()?.len_utf8();
            from = whole.start() + step;
        }
    }

    /// First definition after `winner` with a non-empty match starting exactly at `at`.
    fn find_after_empty(&self, input: &str, at: usize, winner: usize) -> Option<Found<'_>> {
        self.singles
            .iter()
            .enumerate()
            .skip(winner + 1)
            .find_map(|(index, single)| {
                let m = single.find_at(input, at)?;
                (m.start() == at && !m.is_empty()).then(|| Found {
                    start: m.start(),
                    end: m.end(),
                    definition: &self.definitions[index],
                })
            })
    }
}

/// Per-context matchers compiled from one token table.
///
/// A factory is immutable once built and can be shared between threads; every
/// [Tokenizer] it hands out owns its own cursor state.
#[derive(Debug, Clone)]
pub struct TokenizerFactory {
    matchers: BTreeMap<Context, ContextMatcher>,
}

impl TokenizerFactory {
    pub fn new(table: &TokenTable) -> Result<Self, ConfigError> {
        let mut matchers = BTreeMap::new();
        for context in Context::ALL {
            let definitions: Vec<TokenDef> = table.for_context(context).cloned().collect();
            if definitions.is_empty() {
                continue;
            }
            matchers.insert(context, ContextMatcher::compile(context, definitions)?);
        }
        Ok(TokenizerFactory { matchers })
    }

    pub fn from_config(config: &HistoneConfig) -> Result<Self, ConfigError> {
        Self::new(&config.token_table()?)
    }

    /// Factory for the embedded default token table.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::from_config(&crate::histone::config::load_defaults()?)
    }

    pub fn matcher(&self, context: Context) -> Option<&ContextMatcher> {
        self.matchers.get(&context)
    }

    /// Contexts that have at least one definition.
    pub fn contexts(&self) -> impl Iterator<Item = Context> + '_ {
        self.matchers.keys().copied()
    }

    /// Check that `context` can start a scan.
    pub fn validate_start(&self, context: Context) -> Result<(), ConfigError> {
        if self.matchers.contains_key(&context) {
            Ok(())
        } else {
            Err(ConfigError::UndefinedContext(context))
        }
    }

    /// Bind a new tokenizer to `input`, scanning from `start`.
    pub fn tokenizer<'a>(
        &'a self,
        input: &'a str,
        start: Context,
    ) -> Result<Tokenizer<'a>, ConfigError> {
        Tokenizer::new(self, input, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histone::lexing::table::transition_rule;
    use crate::histone::token::{TokenClass, TokenKind};

    fn def(kind: TokenKind, pattern: &str) -> TokenDef {
        TokenDef::new(
            Context::Block,
            kind,
            TokenClass::Normal,
            pattern,
            transition_rule("stay").unwrap(),
        )
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let table = TokenTable::new(vec![
            def(TokenKind::NotEqual, r"isNot\b"),
            def(TokenKind::Equal, r"is\b"),
            def(TokenKind::Identifier, r"[a-zA-Z]+"),
        ]);
        let factory = TokenizerFactory::new(&table).unwrap();
        let matcher = factory.matcher(Context::Block).unwrap();

        let found = matcher.find_at("isNot", 0).unwrap();
        assert_eq!(found.definition.kind, TokenKind::NotEqual);
        let found = matcher.find_at("is", 0).unwrap();
        assert_eq!(found.definition.kind, TokenKind::Equal);
        let found = matcher.find_at("island", 0).unwrap();
        assert_eq!(found.definition.kind, TokenKind::Identifier);
    }

    #[test]
    fn test_combined_pattern_is_ordered_alternation() {
        let table = TokenTable::new(vec![def(TokenKind::Int, r"\d+"), def(TokenKind::Plus, r"\+")]);
        let factory = TokenizerFactory::new(&table).unwrap();
        assert_eq!(
            factory.matcher(Context::Block).unwrap().pattern(),
            r"(\d+)|(\+)"
        );
    }

    #[test]
    fn test_inner_groups_do_not_shift_definitions() {
        let table = TokenTable::new(vec![
            def(TokenKind::Double, r"(\d+)\.(\d+)"),
            def(TokenKind::Identifier, r"([a-z])+"),
            def(TokenKind::Plus, r"\+"),
        ]);
        let factory = TokenizerFactory::new(&table).unwrap();
        let matcher = factory.matcher(Context::Block).unwrap();
        assert_eq!(matcher.find_at("+", 0).unwrap().definition.kind, TokenKind::Plus);
        assert_eq!(matcher.find_at("ab", 0).unwrap().definition.kind, TokenKind::Identifier);
        assert_eq!(matcher.find_at("1.5", 0).unwrap().definition.kind, TokenKind::Double);
    }

    #[test]
    fn test_find_is_not_anchored() {
        let table = TokenTable::new(vec![def(TokenKind::Plus, r"\+")]);
        let factory = TokenizerFactory::new(&table).unwrap();
        let found = factory.matcher(Context::Block).unwrap().find_at("ab+c", 0).unwrap();
        assert_eq!((found.start, found.end), (2, 3));
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        let table = TokenTable::new(vec![def(TokenKind::Int, r"\d*")]);
        let factory = TokenizerFactory::new(&table).unwrap();
        let matcher = factory.matcher(Context::Block).unwrap();
        let found = matcher.find_at("ab12", 0).unwrap();
        assert_eq!((found.start, found.end), (2, 4));
        assert!(matcher.find_at("abc", 0).is_none());
    }

    #[test]
    fn test_later_definition_wins_over_empty_match() {
        let table = TokenTable::new(vec![def(TokenKind::Int, r"\d*"), def(TokenKind::Plus, r"\+")]);
        let factory = TokenizerFactory::new(&table).unwrap();
        let found = factory.matcher(Context::Block).unwrap().find_at("+", 0).unwrap();
        assert_eq!(found.definition.kind, TokenKind::Plus);
        assert_eq!((found.start, found.end), (0, 1));

        let kinds: Vec<TokenKind> = factory
            .tokenizer("+12", Context::Block)
            .unwrap()
            .collect_tokens()
            .iter()
            .map(|token| token.kind)
            .collect();
        assert_eq!(kinds, vec![TokenKind::Plus, TokenKind::Int, TokenKind::Eof]);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let table = TokenTable::new(vec![def(TokenKind::Int, r"(\d+")]);
        let err = TokenizerFactory::new(&table).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { kind: TokenKind::Int, .. }));
    }

    #[test]
    fn test_undefined_start_context_is_rejected() {
        let table = TokenTable::new(vec![def(TokenKind::Int, r"\d+")]);
        let factory = TokenizerFactory::new(&table).unwrap();
        assert!(factory.validate_start(Context::Block).is_ok());
        let err = factory.tokenizer("1", Context::Template).unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedContext(Context::Template)));
    }
}
