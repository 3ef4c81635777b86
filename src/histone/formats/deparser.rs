//! Deparser
//!
//!     Renders an AST back into readable pseudo-source. The output is meant for
//!     debugging and diffing trees; it does not have to parse again. Strings lose their
//!     quotes, every binary operation gets parentheses and each arm of an if chain is
//!     rendered as an if of its own, the else arm included.
//!
//!     Top-level and body items render one per line at the current depth. Raw template
//!     text is copied as is. Depth is passed down explicitly, so one deparser can be
//!     shared freely.

use crate::histone::ast::{wire, AstError, Item, MapEntry, Node, Segment, Template};
use crate::histone::config::DeparserConfig;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Deparser {
    indent: String,
}

impl Default for Deparser {
    fn default() -> Self {
        Deparser::new(&DeparserConfig::default())
    }
}

impl Deparser {
    pub fn new(config: &DeparserConfig) -> Self {
        Deparser {
            indent: config.indent.clone(),
        }
    }

    /// Render a root sequence.
    pub fn deparse(&self, items: &[Item]) -> String {
        self.items(items, 0)
    }

    pub fn deparse_template(&self, template: &Template) -> String {
        self.deparse(template.items())
    }

    /// Render a wire AST, bare or enveloped.
    pub fn deparse_value(&self, value: &Value) -> Result<String, AstError> {
        Ok(self.deparse(&wire::from_value(value)?))
    }

    fn pad(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }

    fn items(&self, items: &[Item], depth: usize) -> String {
        let mut out = String::new();
        for item in items {
            match item {
                Item::Text(text) => out.push_str(text),
                Item::Node(node) => out.push_str(&self.statement(node, depth)),
            }
        }
        out
    }

    /// A body used as a value, e.g. a var or call-block body: items concatenated on
    /// one line.
    fn inline(&self, items: &[Item], depth: usize) -> String {
        items
            .iter()
            .map(|item| match item {
                Item::Text(text) => text.clone(),
                Item::Node(node) => self.expr(node, depth),
            })
            .collect()
    }

    fn block(&self, header: String, body: &[Item], depth: usize) -> String {
        let pad = self.pad(depth);
        format!("{}{} {{\n{}{}}}", pad, header, self.items(body, depth + 1), pad)
    }

    /// A node standing on its own line.
    fn statement(&self, node: &Node, depth: usize) -> String {
        match node {
            Node::Statements(items) => self.items(items, depth),
            Node::If(arms) => arms
                .iter()
                .map(|arm| {
                    let header = format!("if ({})", self.expr(&arm.condition, depth));
                    self.block(header, &arm.body, depth) + "\n"
                })
                .collect(),
            Node::For {
                names,
                collection,
                body,
                otherwise,
            } => {
                let header = format!(
                    "for ({} in {})",
                    names.join(","),
                    self.expr(collection, depth)
                );
                let mut out = self.block(header, body, depth);
                if let Some(otherwise) = otherwise {
                    out.push_str(" else {\n");
                    out.push_str(&self.items(otherwise, depth + 1));
                    out.push_str(&self.pad(depth));
                    out.push('}');
                }
                out + "\n"
            }
            Node::Macro { name, params, body } => {
                let header = format!("macro {}({})", name, params.join(", "));
                self.block(header, body, depth) + "\n"
            }
            other => {
                let terminator = if other.takes_semicolon() { ";" } else { "" };
                format!("{}{}{}\n", self.pad(depth), self.expr(other, depth), terminator)
            }
        }
    }

    /// A node inside an expression.
    fn expr(&self, node: &Node, depth: usize) -> String {
        match node {
            Node::True => "true".to_string(),
            Node::False => "false".to_string(),
            Node::Null => "null".to_string(),
            Node::Int(value) => value.to_string(),
            Node::Double(value) => value.to_string(),
            Node::String(text) => text.clone(),
            Node::Unary { op, operand } => {
                format!("{}({})", op.symbol(), self.expr(operand, depth))
            }
            Node::Binary { op, left, right } => format!(
                "({} {} {})",
                self.expr(left, depth),
                op.symbol(),
                self.expr(right, depth)
            ),
            Node::Ternary {
                condition,
                then,
                otherwise,
            } => {
                let mut out = format!(
                    "({}) ? ({})",
                    self.expr(condition, depth),
                    self.expr(then, depth)
                );
                if let Some(otherwise) = otherwise {
                    out.push_str(&format!(" : ({})", self.expr(otherwise, depth)));
                }
                out
            }
            Node::Selector(path) => path
                .iter()
                .map(|segment| self.segment(segment, depth))
                .collect::<Vec<_>>()
                .join("."),
            Node::Call { target, name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.expr(arg, depth))
                    .collect::<Vec<_>>()
                    .join(", ");
                let name = self.segment(name, depth);
                match target {
                    Some(target) => format!("{}.{}({})", self.expr(target, depth), name, args),
                    None => format!("{}({})", name, args),
                }
            }
            Node::Map(entries) => format!("[{}]", self.map_entries(entries, depth)),
            Node::Statements(items) => self.inline(items, depth),
            Node::Import(path) => format!("import \"{}\"", path),
            Node::Var { name, value } => format!("{} = {}", name, self.expr(value, depth)),
            Node::If(_) | Node::For { .. } | Node::Macro { .. } => self.statement(node, depth),
        }
    }

    fn segment(&self, segment: &Segment, depth: usize) -> String {
        match segment {
            Segment::Name(name) => name.clone(),
            Segment::Expr(node) => self.expr(node, depth),
        }
    }

    /// Entries in source order; an entry whose rendering repeats an earlier one is
    /// dropped.
    fn map_entries(&self, entries: &[MapEntry], depth: usize) -> String {
        let mut seen = HashSet::new();
        let mut rendered = Vec::with_capacity(entries.len());
        for entry in entries {
            let value = self.expr(&entry.value, depth);
            let text = match &entry.key {
                Some(key) => format!("{} : {}", key, value),
                None => value,
            };
            if seen.insert(text.clone()) {
                rendered.push(text);
            }
        }
        rendered.join(", ")
    }
}

/// Render a wire AST with the default indent.
pub fn deparse(value: &Value) -> Result<String, AstError> {
    Deparser::default().deparse_value(value)
}
