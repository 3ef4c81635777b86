//! Output formats for parsed templates
//!
//! This module contains the ways a parsed template leaves the crate:
//! - the format registry, rendering a [Template](crate::histone::ast::Template) by name
//!   (ast-json, ast-json-pretty, source, treeviz)
//! - the deparser, turning a tree back into readable pseudo-source
//! - structural fingerprints of the wire form

pub mod deparser;
pub mod fingerprint;
pub mod registry;
pub mod treeviz;

pub use deparser::{deparse, Deparser};
pub use fingerprint::{fingerprint, node_count, string_hash, Fingerprint};
pub use registry::{
    AstJsonFormatter, AstJsonPrettyFormatter, FormatError, FormatRegistry, Formatter,
    SourceFormatter,
};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
