//! # histone
//!
//! Front end for the histone template language: a table-driven tokenizer, a
//! recursive-descent parser producing a tagged-array AST, a deparser and structural
//! fingerprints.
//!
//! ```
//! use histone::histone::parsing::parse_template;
//!
//! let template = parse_template("a {{1 + 2}} b").unwrap();
//! assert_eq!(template.to_value().to_string(), r#"["a ",[9,[101,1],[101,2]]," b"]"#);
//! ```

pub mod histone;
