//! Structural fingerprints of a wire AST.
//!
//! Both functions walk the tagged-array form and ignore what the arrays mean:
//!
//! - [fingerprint] sums the string hash of every leaf's text (tags and numbers by their
//!   digits, strings by their content, `null` and booleans by their keyword). Addition
//!   commutes, so reordering siblings keeps the fingerprint; differently shaped trees
//!   can collide.
//! - [node_count] counts every array and every leaf once.
//!
//! The hash is the 31-multiplier polynomial over UTF-16 code units, with wrapping `i32`
//! arithmetic, so fingerprints match those computed by JVM tooling for the same tree.

use crate::histone::ast::{wire, Item};
use serde_json::Value;
use std::fmt;

/// `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units, wrapping.
pub fn string_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn hash_sum(value: &Value) -> i32 {
    match value {
        Value::Array(elements) => elements
            .iter()
            .fold(0i32, |sum, element| sum.wrapping_add(hash_sum(element))),
        Value::Object(fields) => fields
            .values()
            .fold(0i32, |sum, element| sum.wrapping_add(hash_sum(element))),
        leaf => leaf_text(leaf).map_or(0, |text| string_hash(&text)),
    }
}

fn count(value: &Value) -> usize {
    match value {
        Value::Array(elements) => 1 + elements.iter().map(count).sum::<usize>(),
        Value::Object(fields) => 1 + fields.values().map(count).sum::<usize>(),
        _ => 1,
    }
}

/// Sum of leaf hashes of a bare or enveloped AST.
pub fn fingerprint(value: &Value) -> i32 {
    hash_sum(wire::unwrap_envelope(value))
}

/// Containers plus leaves of a bare or enveloped AST.
pub fn node_count(value: &Value) -> usize {
    count(wire::unwrap_envelope(value))
}

/// Both fingerprints of one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub hash: i32,
    pub nodes: usize,
}

impl Fingerprint {
    pub fn of_value(value: &Value) -> Self {
        Fingerprint {
            hash: fingerprint(value),
            nodes: node_count(value),
        }
    }

    pub fn of_items(items: &[Item]) -> Self {
        Self::of_value(&wire::to_value(items))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fingerprint={} nodes={}", self.hash, self.nodes)
    }
}
