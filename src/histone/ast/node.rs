//! AST node types and constructors.
//!
//!     A template parses to a sequence of [Item]s: raw text copied verbatim from the
//!     source, and [Node]s for everything inside `{{ ... }}`. `Node` is a closed enum with
//!     one variant per node kind tag; the tagged-array form the rest of the tool chain
//!     exchanges is produced by [crate::histone::ast::wire].
//!
//!     The constructors on `Node` are the node factory the parser builds trees with. They
//!     take care of boxing so call sites read like the grammar.

use super::decimal::Decimal;
use super::tags::Tag;
use num_bigint::BigInt;

/// One element of a template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Raw template text, untagged on the wire
    Text(String),
    Node(Node),
}

impl Item {
    pub fn text(text: impl Into<String>) -> Self {
        Item::Text(text.into())
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Item::Node(node) => Some(node),
            Item::Text(_) => None,
        }
    }
}

impl From<Node> for Item {
    fn from(node: Node) -> Self {
        Item::Node(node)
    }
}

/// One step of a selector path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.name`, or the leading identifier
    Name(String),
    /// `[expr]`, or a non-selector expression the path was promoted from
    Expr(Box<Node>),
}

impl Segment {
    pub fn name(name: impl Into<String>) -> Self {
        Segment::Name(name.into())
    }

    pub fn expr(node: Node) -> Self {
        Segment::Expr(Box::new(node))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn tag(self) -> Tag {
        match self {
            UnaryOp::Negate => Tag::Negate,
            UnaryOp::Not => Tag::Not,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    LessOrEqual,
    LessThan,
    GreaterOrEqual,
    GreaterThan,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 13] = [
        BinaryOp::Or,
        BinaryOp::And,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::LessOrEqual,
        BinaryOp::LessThan,
        BinaryOp::GreaterOrEqual,
        BinaryOp::GreaterThan,
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
    ];

    pub fn tag(self) -> Tag {
        match self {
            BinaryOp::Or => Tag::Or,
            BinaryOp::And => Tag::And,
            BinaryOp::Equal => Tag::Equal,
            BinaryOp::NotEqual => Tag::NotEqual,
            BinaryOp::LessOrEqual => Tag::LessOrEqual,
            BinaryOp::LessThan => Tag::LessThan,
            BinaryOp::GreaterOrEqual => Tag::GreaterOrEqual,
            BinaryOp::GreaterThan => Tag::GreaterThan,
            BinaryOp::Add => Tag::Add,
            BinaryOp::Sub => Tag::Sub,
            BinaryOp::Mul => Tag::Mul,
            BinaryOp::Div => Tag::Div,
            BinaryOp::Mod => Tag::Mod,
        }
    }

    pub fn from_tag(tag: Tag) -> Option<BinaryOp> {
        BinaryOp::ALL.iter().copied().find(|op| op.tag() == tag)
    }

    /// Operator spelling used by the deparser.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// A map literal entry. Keys are normalized to text when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub key: Option<String>,
    pub value: Node,
}

/// One condition/body pair of an if chain. An `else` arm carries [Node::True].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfArm {
    pub condition: Node,
    pub body: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    True,
    False,
    Null,
    Int(BigInt),
    Double(Decimal),
    String(String),
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `cond ? then` has no `otherwise`; that shape is distinct from the 3-child one
    Ternary {
        condition: Box<Node>,
        then: Box<Node>,
        otherwise: Option<Box<Node>>,
    },
    Selector(Vec<Segment>),
    /// Zero-argument calls carry an empty `args` list. A selector without parentheses is
    /// never a call.
    Call {
        target: Option<Box<Node>>,
        name: Segment,
        args: Vec<Node>,
    },
    Map(Vec<MapEntry>),
    Statements(Vec<Item>),
    Import(String),
    If(Vec<IfArm>),
    /// `value` is an expression, or a [Node::Statements] for the block form
    Var {
        name: String,
        value: Box<Node>,
    },
    For {
        names: Vec<String>,
        collection: Box<Node>,
        body: Vec<Item>,
        otherwise: Option<Vec<Item>>,
    },
    Macro {
        name: String,
        params: Vec<String>,
        body: Vec<Item>,
    },
}

impl Node {
    pub fn tag(&self) -> Tag {
        match self {
            Node::True => Tag::True,
            Node::False => Tag::False,
            Node::Null => Tag::Null,
            Node::Int(_) => Tag::Int,
            Node::Double(_) => Tag::Double,
            Node::String(_) => Tag::String,
            Node::Unary { op, .. } => op.tag(),
            Node::Binary { op, .. } => op.tag(),
            Node::Ternary { .. } => Tag::Ternary,
            Node::Selector(_) => Tag::Selector,
            Node::Call { .. } => Tag::Call,
            Node::Map(_) => Tag::Map,
            Node::Statements(_) => Tag::Statements,
            Node::Import(_) => Tag::Import,
            Node::If(_) => Tag::If,
            Node::Var { .. } => Tag::Var,
            Node::For { .. } => Tag::For,
            Node::Macro { .. } => Tag::Macro,
        }
    }

    pub fn int(value: impl Into<BigInt>) -> Self {
        Node::Int(value.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::String(text.into())
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn ternary(condition: Node, then: Node, otherwise: Option<Node>) -> Self {
        Node::Ternary {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    /// One-segment selector naming a variable.
    pub fn name(name: impl Into<String>) -> Self {
        Node::Selector(vec![Segment::name(name)])
    }

    pub fn call(target: Option<Node>, name: Segment, args: Vec<Node>) -> Self {
        Node::Call {
            target: target.map(Box::new),
            name,
            args,
        }
    }

    pub fn var(name: impl Into<String>, value: Node) -> Self {
        Node::Var {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Append a path segment, promoting a non-selector into a one-segment selector first.
    pub fn push_segment(self, segment: Segment) -> Node {
        match self {
            Node::Selector(mut path) => {
                path.push(segment);
                Node::Selector(path)
            }
            other => Node::Selector(vec![Segment::expr(other), segment]),
        }
    }

    /// Whether the node reads as a statement and ends with `;` when it stands alone.
    pub fn takes_semicolon(&self) -> bool {
        matches!(
            self,
            Node::Ternary { .. } | Node::Call { .. } | Node::Var { .. } | Node::Import(_)
        )
    }
}
