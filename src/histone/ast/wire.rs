//! Wire format
//!
//!     The tagged-array encoding of the AST, as a `serde_json::Value`. Every node is an
//!     array whose element 0 is its [Tag] code; raw template text is a bare string inside
//!     a sequence. The shapes:
//!
//!         [16] [17] [18]                          true, false, null
//!         [101, 1] [102, 1.50] [103, "text"]      literals, numbers keep their digits
//!         [14, x] [15, x]                          negate, not
//!         [9, a, b] ...                            binary operators
//!         [104, cond, then] / [104, cond, then, else]
//!         [105, [seg, ...]]                        seg is "name" or a node
//!         [106, target|null, seg, [args...]]
//!         [107, [[key|null, value], ...]]
//!         [108, [items...]]
//!         [109, "path"]
//!         [1000, [[cond, [items]], ...]]
//!         [1001, name, expr]
//!         [1002, [names], expr, [[items], [items]?]]
//!         [1003, name, [params], [items]]
//!
//!     A root is a sequence of items, optionally wrapped in the envelope
//!     `[["HISTONE", meta], root]`. Decoding unwraps the envelope.
//!
//!     Numbers rely on serde_json's `arbitrary_precision` feature so integer and decimal
//!     literals survive a JSON round trip digit for digit. YAML input is lossy for
//!     decimals: serde_yaml reads them as `f64`, so `2.50` decodes as `2.5`. Decimals whose
//!     scale or exponent exceeds [MAX_EXP](super::decimal::MAX_EXP) are rejected.

use super::decimal::Decimal;
use super::error::AstError;
use super::node::{BinaryOp, IfArm, Item, MapEntry, Node, Segment, UnaryOp};
use super::tags::Tag;
use num_bigint::BigInt;
use serde_json::{Number, Value};
use std::str::FromStr;

/// First element of the envelope header.
pub const SIGNATURE: &str = "HISTONE";

// ---------------------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------------------

/// Encode a root sequence.
pub fn to_value(items: &[Item]) -> Value {
    Value::Array(items.iter().map(item_to_value).collect())
}

pub fn item_to_value(item: &Item) -> Value {
    match item {
        Item::Text(text) => Value::String(text.clone()),
        Item::Node(node) => node_to_value(node),
    }
}

fn tagged(tag: Tag, children: Vec<Value>) -> Value {
    let mut array = Vec::with_capacity(children.len() + 1);
    array.push(Value::from(tag.code()));
    array.extend(children);
    Value::Array(array)
}

fn number(text: String) -> Value {
    match Number::from_str(&text) {
        Ok(number) => Value::Number(number),
        Err(_) => Value::String(text),
    }
}

fn strings(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

fn segment_to_value(segment: &Segment) -> Value {
    match segment {
        Segment::Name(name) => Value::String(name.clone()),
        Segment::Expr(node) => node_to_value(node),
    }
}

pub fn node_to_value(node: &Node) -> Value {
    let tag = node.tag();
    match node {
        Node::True | Node::False | Node::Null => tagged(tag, vec![]),
        Node::Int(value) => tagged(tag, vec![number(value.to_string())]),
        Node::Double(value) => tagged(tag, vec![number(value.to_string())]),
        Node::String(text) => tagged(tag, vec![Value::String(text.clone())]),
        Node::Unary { operand, .. } => tagged(tag, vec![node_to_value(operand)]),
        Node::Binary { left, right, .. } => {
            tagged(tag, vec![node_to_value(left), node_to_value(right)])
        }
        Node::Ternary {
            condition,
            then,
            otherwise,
        } => {
            let mut children = vec![node_to_value(condition), node_to_value(then)];
            if let Some(otherwise) = otherwise {
                children.push(node_to_value(otherwise));
            }
            tagged(tag, children)
        }
        Node::Selector(path) => tagged(
            tag,
            vec![Value::Array(path.iter().map(segment_to_value).collect())],
        ),
        Node::Call { target, name, args } => tagged(
            tag,
            vec![
                target
                    .as_deref()
                    .map_or(Value::Null, node_to_value),
                segment_to_value(name),
                Value::Array(args.iter().map(node_to_value).collect()),
            ],
        ),
        Node::Map(entries) => tagged(
            tag,
            vec![Value::Array(
                entries
                    .iter()
                    .map(|entry| {
                        Value::Array(vec![
                            entry.key.clone().map_or(Value::Null, Value::String),
                            node_to_value(&entry.value),
                        ])
                    })
                    .collect(),
            )],
        ),
        Node::Statements(items) => tagged(tag, vec![to_value(items)]),
        Node::Import(path) => tagged(tag, vec![Value::String(path.clone())]),
        Node::If(arms) => tagged(
            tag,
            vec![Value::Array(
                arms.iter()
                    .map(|arm| Value::Array(vec![node_to_value(&arm.condition), to_value(&arm.body)]))
                    .collect(),
            )],
        ),
        Node::Var { name, value } => {
            tagged(tag, vec![Value::String(name.clone()), node_to_value(value)])
        }
        Node::For {
            names,
            collection,
            body,
            otherwise,
        } => {
            let mut bodies = vec![to_value(body)];
            if let Some(otherwise) = otherwise {
                bodies.push(to_value(otherwise));
            }
            tagged(
                tag,
                vec![strings(names), node_to_value(collection), Value::Array(bodies)],
            )
        }
        Node::Macro { name, params, body } => tagged(
            tag,
            vec![Value::String(name.clone()), strings(params), to_value(body)],
        ),
    }
}

/// Wrap a root in the signature envelope.
pub fn envelope(meta: Value, root: Value) -> Value {
    Value::Array(vec![
        Value::Array(vec![Value::String(SIGNATURE.to_string()), meta]),
        root,
    ])
}

// ---------------------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------------------

/// Split an enveloped root into its metadata and the bare root. A bare root is returned
/// unchanged with no metadata.
pub fn split_envelope(value: &Value) -> (Option<&Value>, &Value) {
    if let Value::Array(outer) = value {
        if let [Value::Array(header), root] = outer.as_slice() {
            if header.first().and_then(Value::as_str) == Some(SIGNATURE) {
                return (Some(header.get(1).unwrap_or(&Value::Null)), root);
            }
        }
    }
    (None, value)
}

/// The bare root of a possibly enveloped AST.
pub fn unwrap_envelope(value: &Value) -> &Value {
    split_envelope(value).1
}

/// Decode a root, bare or enveloped.
pub fn from_value(value: &Value) -> Result<Vec<Item>, AstError> {
    items_from_value(unwrap_envelope(value), "a template body")
}

/// Read a JSON AST fixture.
pub fn from_json_str(text: &str) -> Result<Value, AstError> {
    serde_json::from_str(text).map_err(|e| AstError::Syntax(e.to_string()))
}

/// Read a YAML AST fixture. YAML sequences and scalars map onto the same tagged arrays;
/// decimal numbers keep their value but not their trailing zeros.
pub fn from_yaml_str(text: &str) -> Result<Value, AstError> {
    serde_yaml::from_str(text).map_err(|e| AstError::Syntax(e.to_string()))
}

fn array<'v>(value: &'v Value, position: &'static str) -> Result<&'v [Value], AstError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| AstError::NotAnArray {
            position,
            found: value.to_string(),
        })
}

fn items_from_value(value: &Value, position: &'static str) -> Result<Vec<Item>, AstError> {
    array(value, position)?
        .iter()
        .map(|element| match element {
            Value::String(text) => Ok(Item::Text(text.clone())),
            other => node_from_value(other).map(Item::Node),
        })
        .collect()
}

fn text(tag: Tag, value: &Value, expected: &'static str) -> Result<String, AstError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AstError::InvalidChild {
            tag,
            expected,
            found: value.to_string(),
        })
}

fn texts(tag: Tag, value: &Value, expected: &'static str) -> Result<Vec<String>, AstError> {
    array(value, expected)?
        .iter()
        .map(|element| text(tag, element, expected))
        .collect()
}

fn number_text(tag: Tag, value: &Value) -> Result<String, AstError> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        other => Err(AstError::InvalidChild {
            tag,
            expected: "a number",
            found: other.to_string(),
        }),
    }
}

fn segment_from_value(tag: Tag, value: &Value) -> Result<Segment, AstError> {
    match value {
        Value::String(name) => Ok(Segment::Name(name.clone())),
        Value::Array(_) => Ok(Segment::expr(node_from_value(value)?)),
        other => Err(AstError::InvalidChild {
            tag,
            expected: "a name or a node as path segment",
            found: other.to_string(),
        }),
    }
}

fn boxed(value: &Value) -> Result<Box<Node>, AstError> {
    node_from_value(value).map(Box::new)
}

/// Decode one tagged node.
pub fn node_from_value(value: &Value) -> Result<Node, AstError> {
    let elements = array(value, "a node")?;
    let tag = elements
        .first()
        .and_then(Value::as_i64)
        .and_then(Tag::from_code)
        .ok_or_else(|| AstError::UnknownTag(value.to_string()))?;
    let children = &elements[1..];

    let arity = |expected: &'static str, allowed: &[usize]| {
        if allowed.contains(&children.len()) {
            Ok(())
        } else {
            Err(AstError::Arity {
                tag,
                expected,
                found: children.len(),
            })
        }
    };

    let node = match tag {
        Tag::True | Tag::False | Tag::Null => {
            arity("0", &[0])?;
            match tag {
                Tag::True => Node::True,
                Tag::False => Node::False,
                _ => Node::Null,
            }
        }
        Tag::Int => {
            arity("1", &[1])?;
            let digits = number_text(tag, &children[0])?;
            let value = BigInt::from_str(&digits)
                .map_err(|_| AstError::InvalidNumber { tag, text: digits })?;
            Node::Int(value)
        }
        Tag::Double => {
            arity("1", &[1])?;
            let digits = number_text(tag, &children[0])?;
            let value = Decimal::from_str(&digits)
                .map_err(|_| AstError::InvalidNumber { tag, text: digits })?;
            Node::Double(value)
        }
        Tag::String => {
            arity("1", &[1])?;
            Node::String(text(tag, &children[0], "a string")?)
        }
        Tag::Negate | Tag::Not => {
            arity("1", &[1])?;
            let op = if tag == Tag::Negate {
                UnaryOp::Negate
            } else {
                UnaryOp::Not
            };
            Node::Unary {
                op,
                operand: boxed(&children[0])?,
            }
        }
        Tag::Ternary => {
            arity("2 or 3", &[2, 3])?;
            Node::Ternary {
                condition: boxed(&children[0])?,
                then: boxed(&children[1])?,
                otherwise: children.get(2).map(boxed).transpose()?,
            }
        }
        Tag::Selector => {
            arity("1", &[1])?;
            let path = array(&children[0], "a selector path")?
                .iter()
                .map(|segment| segment_from_value(tag, segment))
                .collect::<Result<Vec<_>, _>>()?;
            if path.is_empty() {
                return Err(AstError::InvalidChild {
                    tag,
                    expected: "a non-empty path",
                    found: children[0].to_string(),
                });
            }
            Node::Selector(path)
        }
        Tag::Call => {
            arity("3", &[3])?;
            let target = match &children[0] {
                Value::Null => None,
                other => Some(boxed(other)?),
            };
            let args = array(&children[2], "call arguments")?
                .iter()
                .map(node_from_value)
                .collect::<Result<Vec<_>, _>>()?;
            Node::Call {
                target,
                name: segment_from_value(tag, &children[1])?,
                args,
            }
        }
        Tag::Map => {
            arity("1", &[1])?;
            let entries = array(&children[0], "map entries")?
                .iter()
                .map(|entry| match array(entry, "a map entry")? {
                    [key, value] => Ok(MapEntry {
                        key: match key {
                            Value::Null => None,
                            other => Some(text(tag, other, "a string or null map key")?),
                        },
                        value: node_from_value(value)?,
                    }),
                    other => Err(AstError::InvalidChild {
                        tag,
                        expected: "a [key, value] pair",
                        found: Value::Array(other.to_vec()).to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Node::Map(entries)
        }
        Tag::Statements => {
            arity("1", &[1])?;
            Node::Statements(items_from_value(&children[0], "statements")?)
        }
        Tag::Import => {
            arity("1", &[1])?;
            Node::Import(text(tag, &children[0], "a path string")?)
        }
        Tag::If => {
            arity("1", &[1])?;
            let arms = array(&children[0], "if arms")?
                .iter()
                .map(|arm| match array(arm, "an if arm")? {
                    [condition, body] => Ok(IfArm {
                        condition: node_from_value(condition)?,
                        body: items_from_value(body, "an if body")?,
                    }),
                    other => Err(AstError::InvalidChild {
                        tag,
                        expected: "a [condition, body] pair",
                        found: Value::Array(other.to_vec()).to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Node::If(arms)
        }
        Tag::Var => {
            arity("2", &[2])?;
            Node::Var {
                name: text(tag, &children[0], "a variable name")?,
                value: boxed(&children[1])?,
            }
        }
        Tag::For => {
            arity("3", &[3])?;
            let names = texts(tag, &children[0], "bound names")?;
            if names.is_empty() || names.len() > 2 {
                return Err(AstError::InvalidChild {
                    tag,
                    expected: "one or two bound names",
                    found: children[0].to_string(),
                });
            }
            let bodies = array(&children[2], "loop bodies")?;
            let (body, otherwise) = match bodies {
                [body] => (items_from_value(body, "a loop body")?, None),
                [body, otherwise] => (
                    items_from_value(body, "a loop body")?,
                    Some(items_from_value(otherwise, "an else body")?),
                ),
                _ => {
                    return Err(AstError::InvalidChild {
                        tag,
                        expected: "one or two bodies",
                        found: children[2].to_string(),
                    })
                }
            };
            Node::For {
                names,
                collection: boxed(&children[1])?,
                body,
                otherwise,
            }
        }
        Tag::Macro => {
            arity("3", &[3])?;
            Node::Macro {
                name: text(tag, &children[0], "a macro name")?,
                params: texts(tag, &children[1], "parameter names")?,
                body: items_from_value(&children[2], "a macro body")?,
            }
        }
        binary => {
            arity("2", &[2])?;
            let op = BinaryOp::from_tag(binary).ok_or_else(|| AstError::UnknownTag(value.to_string()))?;
            Node::Binary {
                op,
                left: boxed(&children[0])?,
                right: boxed(&children[1])?,
            }
        }
    };
    Ok(node)
}
