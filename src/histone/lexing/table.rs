//! Token table
//!
//!     The token table is data: an ordered list of definitions, each one naming the context
//!     it belongs to, the token kind it produces, its class, a regular expression and a
//!     transition rule. Order is significant. When two definitions of the same context can
//!     match at the same position, the one registered first wins, which is how `{{*` beats
//!     `{{` and `isNot` beats `is`.
//!
//!     The default table lives in `defaults/histone.default.toml` and is embedded in the
//!     binary; see [crate::histone::config]. Transition rules are plain functions of the
//!     nesting counter, referenced from the table by name.

use crate::histone::config::ConfigError;
use crate::histone::token::{Context, TokenClass, TokenKind};
use serde::Deserialize;

/// A transition rule: receives the tokenizer's nesting counter and returns the context to
/// switch to, or `None` to stay in the current one.
pub type TransitionRule = fn(&mut u32) -> Option<Context>;

/// Named transition rules available to token tables.
pub const TRANSITION_RULES: &[(&str, TransitionRule)] = &[
    ("stay", stay),
    ("template", enter_template),
    ("block", enter_block),
    ("literal", enter_literal),
    ("comment-enter", enter_comment),
    ("comment-leave", leave_comment),
];

fn stay(_nesting: &mut u32) -> Option<Context> {
    None
}

fn enter_template(nesting: &mut u32) -> Option<Context> {
    *nesting = 0;
    Some(Context::Template)
}

fn enter_block(_nesting: &mut u32) -> Option<Context> {
    Some(Context::Block)
}

fn enter_literal(_nesting: &mut u32) -> Option<Context> {
    Some(Context::Literal)
}

fn enter_comment(nesting: &mut u32) -> Option<Context> {
    *nesting += 1;
    Some(Context::Comment)
}

fn leave_comment(nesting: &mut u32) -> Option<Context> {
    *nesting = nesting.saturating_sub(1);
    if *nesting == 0 {
        Some(Context::Template)
    } else {
        None
    }
}

/// Look up a transition rule by the name used in token tables.
pub fn transition_rule(name: &str) -> Option<TransitionRule> {
    TRANSITION_RULES
        .iter()
        .find(|(rule_name, _)| *rule_name == name)
        .map(|(_, rule)| *rule)
}

/// A token definition as written in configuration, before its transition is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenSpec {
    pub context: Context,
    pub kind: TokenKind,
    pub class: TokenClass,
    pub pattern: String,
    #[serde(default)]
    pub transition: Option<String>,
}

/// A resolved, immutable token definition.
#[derive(Debug, Clone)]
pub struct TokenDef {
    pub context: Context,
    pub kind: TokenKind,
    pub class: TokenClass,
    pub pattern: String,
    pub transition: TransitionRule,
}

impl TokenDef {
    pub fn new(
        context: Context,
        kind: TokenKind,
        class: TokenClass,
        pattern: impl Into<String>,
        transition: TransitionRule,
    ) -> Self {
        TokenDef {
            context,
            kind,
            class,
            pattern: pattern.into(),
            transition,
        }
    }

    /// Resolve a configured definition. The transition must be present and known.
    pub fn from_spec(spec: &TokenSpec) -> Result<Self, ConfigError> {
        let name = spec
            .transition
            .as_deref()
            .ok_or(ConfigError::MissingTransition {
                context: spec.context,
                kind: spec.kind,
            })?;
        let transition = transition_rule(name).ok_or_else(|| ConfigError::UnknownTransition {
            kind: spec.kind,
            name: name.to_string(),
        })?;
        Ok(TokenDef::new(
            spec.context,
            spec.kind,
            spec.class,
            spec.pattern.clone(),
            transition,
        ))
    }
}

/// Ordered list of token definitions.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    definitions: Vec<TokenDef>,
}

impl TokenTable {
    pub fn new(definitions: Vec<TokenDef>) -> Self {
        TokenTable { definitions }
    }

    pub fn from_specs(specs: &[TokenSpec]) -> Result<Self, ConfigError> {
        let definitions = specs
            .iter()
            .map(TokenDef::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TokenTable { definitions })
    }

    /// Append a definition after every existing one.
    pub fn push(&mut self, definition: TokenDef) {
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[TokenDef] {
        &self.definitions
    }

    /// Definitions registered under `context`, in registration order.
    pub fn for_context(&self, context: Context) -> impl Iterator<Item = &TokenDef> {
        self.definitions
            .iter()
            .filter(move |def| def.context == context)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
