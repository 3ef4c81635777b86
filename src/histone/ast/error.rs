//! Errors for malformed wire ASTs.

use super::tags::Tag;
use std::fmt;

/// A tagged-array AST that does not follow the node contracts.
///
/// Decoding never patches a malformed tree; the first violation is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    /// Input text is not valid JSON or YAML
    Syntax(String),
    /// Expected an array (a node or a sequence) in the named position
    NotAnArray {
        position: &'static str,
        found: String,
    },
    /// Element 0 is not a known tag
    UnknownTag(String),
    Arity {
        tag: Tag,
        expected: &'static str,
        found: usize,
    },
    InvalidChild {
        tag: Tag,
        expected: &'static str,
        found: String,
    },
    InvalidNumber {
        tag: Tag,
        text: String,
    },
}

impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstError::Syntax(message) => write!(f, "cannot read AST: {}", message),
            AstError::NotAnArray { position, found } => {
                write!(f, "expected an array for {}, found {}", position, found)
            }
            AstError::UnknownTag(found) => write!(f, "unknown node tag {}", found),
            AstError::Arity {
                tag,
                expected,
                found,
            } => write!(
                f,
                "{} node expects {} children, found {}",
                tag, expected, found
            ),
            AstError::InvalidChild {
                tag,
                expected,
                found,
            } => write!(f, "{} node expects {}, found {}", tag, expected, found),
            AstError::InvalidNumber { tag, text } => {
                write!(f, "{} node holds an invalid number '{}'", tag, text)
            }
        }
    }
}

impl std::error::Error for AstError {}
