//! Format registry for AST serialization
//!
//! This module provides a pluggable registry of template serialization formats.
//! Each format implements the `Formatter` trait and can be registered with `FormatRegistry`.

use crate::histone::ast::Template;
use crate::histone::formats::deparser::Deparser;
use std::collections::HashMap;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Trait for template formatters
///
/// Implementors provide a way to serialize a Template to a string representation.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "treeviz", "ast-json")
    fn name(&self) -> &str;

    /// Serialize a template to this format
    fn serialize(&self, template: &Template) -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Compact tagged-array JSON, enveloped when the template carries a signature.
pub struct AstJsonFormatter;

impl Formatter for AstJsonFormatter {
    fn name(&self) -> &str {
        "ast-json"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        Ok(template.to_value().to_string())
    }

    fn description(&self) -> &str {
        "Tagged-array AST as compact JSON"
    }
}

pub struct AstJsonPrettyFormatter;

impl Formatter for AstJsonPrettyFormatter {
    fn name(&self) -> &str {
        "ast-json-pretty"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&template.to_value())
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Tagged-array AST as indented JSON"
    }
}

/// Pseudo-source through the [Deparser] with its default indent.
pub struct SourceFormatter;

impl Formatter for SourceFormatter {
    fn name(&self) -> &str {
        "source"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        Ok(Deparser::default().deparse_template(template))
    }

    fn description(&self) -> &str {
        "Readable pseudo-source rendered by the deparser"
    }
}

/// Registry of template formatters
///
/// Provides a centralized registry for all available serialization formats.
/// Formats can be registered and retrieved by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize a template using the specified format
    pub fn serialize(&self, template: &Template, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(template)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with default formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(AstJsonFormatter);
        registry.register(AstJsonPrettyFormatter);
        registry.register(SourceFormatter);
        registry.register(super::TreevizFormatter);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
