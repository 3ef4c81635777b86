//! Configuration loader for the histone front end.
//!
//! `defaults/histone.default.toml` is embedded into the crate so the default token table,
//! the documentation and runtime behavior stay in sync. Applications layer their own files
//! on top of those defaults via [`Loader`] before deserializing into [`HistoneConfig`].
//!
//! Tables merge key by key, arrays do not: a layered file that defines `[[tokens]]`
//! replaces the whole default token table.

use crate::histone::lexing::table::{TokenSpec, TokenTable};
use crate::histone::token::{Context, TokenKind};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/histone.default.toml");

/// Setup errors: a broken token table, an unusable start context or a configuration
/// source that failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A scan was requested in a context no definition is registered under
    UndefinedContext(Context),
    MissingTransition { context: Context, kind: TokenKind },
    UnknownTransition { kind: TokenKind, name: String },
    InvalidPattern {
        kind: TokenKind,
        pattern: String,
        message: String,
    },
    Load(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UndefinedContext(context) => {
                write!(f, "no token definitions for context '{}'", context)
            }
            ConfigError::MissingTransition { context, kind } => write!(
                f,
                "token definition {:?} in context '{}' has no transition",
                kind, context
            ),
            ConfigError::UnknownTransition { kind, name } => {
                write!(f, "token definition {:?} uses unknown transition '{}'", kind, name)
            }
            ConfigError::InvalidPattern {
                kind,
                pattern,
                message,
            } => write!(
                f,
                "invalid pattern for {:?} ({}): {}",
                kind, pattern, message
            ),
            ConfigError::Load(message) => write!(f, "failed to load configuration: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<::config::ConfigError> for ConfigError {
    fn from(err: ::config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Top-level configuration consumed by histone applications.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoneConfig {
    pub lexer: LexerConfig,
    pub deparser: DeparserConfig,
    pub tokens: Vec<TokenSpec>,
}

impl HistoneConfig {
    /// Resolve the configured token definitions, in order.
    pub fn token_table(&self) -> Result<TokenTable, ConfigError> {
        TokenTable::from_specs(&self.tokens)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexerConfig {
    /// Context a template is scanned from
    pub start_context: Context,
}

/// Knobs of the pseudo-source renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct DeparserConfig {
    /// Text emitted once per nesting level
    pub indent: String,
}

impl Default for DeparserConfig {
    fn default() -> Self {
        DeparserConfig {
            indent: "  ".to_string(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, e.g. a token table assembled by a test or an embedding tool.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<HistoneConfig, ConfigError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<HistoneConfig, ConfigError> {
    Loader::new().build()
}
