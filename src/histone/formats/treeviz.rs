//! Treeviz formatter for template ASTs
//!
//! Treeviz is a visual representation of the AST with one line per node, which makes
//! deep expression trees quick to scan. Nesting is drawn with box connectors, and each
//! line is
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example:
//!
//! ⧉ template (3 items)
//! ├─ ↵ "Hello, "
//! ├─ ○ SELECTOR user.name
//! └─ § IF (2 arms)
//!   ├─ ⋯ arm
//!   │ ├─ ○ SELECTOR visible
//!   │ └─ ↵ "shown"
//!   └─ ⋯ arm
//!     ├─ ○ TRUE
//!     └─ ↵ "hidden"
//!
//! Icons
//!     Template: ⧉
//!     Text: ↵
//!     Block constructs (if, for, macro, var, import, statements): §
//!     Expressions: ○
//!     Arms, bodies, map entries and path segments: ⋯

use crate::histone::ast::{Item, Node, Segment, Tag, Template};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// One node of the rendered tree.
struct Snapshot {
    icon: &'static str,
    label: String,
    children: Vec<Snapshot>,
}

impl Snapshot {
    fn leaf(icon: &'static str, label: impl Into<String>) -> Self {
        Snapshot {
            icon,
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn with_children(icon: &'static str, label: impl Into<String>, children: Vec<Snapshot>) -> Self {
        Snapshot {
            icon,
            label: label.into(),
            children,
        }
    }
}

fn get_icon(tag: Tag) -> &'static str {
    match tag {
        Tag::If
        | Tag::For
        | Tag::Macro
        | Tag::Var
        | Tag::Import
        | Tag::Statements => "§",
        _ => "○",
    }
}

fn items_snapshots(items: &[Item]) -> Vec<Snapshot> {
    items.iter().map(item_snapshot).collect()
}

fn item_snapshot(item: &Item) -> Snapshot {
    match item {
        Item::Text(text) => Snapshot::leaf("↵", format!("{:?}", text)),
        Item::Node(node) => node_snapshot(node),
    }
}

fn body(label: &str, items: &[Item]) -> Snapshot {
    Snapshot::with_children("⋯", label, items_snapshots(items))
}

fn segment_label(segment: &Segment) -> String {
    match segment {
        Segment::Name(name) => name.clone(),
        Segment::Expr(node) => format!("[{}]", node.tag()),
    }
}

fn node_snapshot(node: &Node) -> Snapshot {
    let tag = node.tag();
    let icon = get_icon(tag);
    match node {
        Node::True | Node::False | Node::Null => Snapshot::leaf(icon, tag.name()),
        Node::Int(value) => Snapshot::leaf(icon, format!("{} {}", tag, value)),
        Node::Double(value) => Snapshot::leaf(icon, format!("{} {}", tag, value)),
        Node::String(text) => Snapshot::leaf(icon, format!("{} {:?}", tag, text)),
        Node::Unary { operand, .. } => {
            Snapshot::with_children(icon, tag.name(), vec![node_snapshot(operand)])
        }
        Node::Binary { left, right, .. } => Snapshot::with_children(
            icon,
            tag.name(),
            vec![node_snapshot(left), node_snapshot(right)],
        ),
        Node::Ternary {
            condition,
            then,
            otherwise,
        } => {
            let mut children = vec![node_snapshot(condition), node_snapshot(then)];
            children.extend(otherwise.as_deref().map(node_snapshot));
            Snapshot::with_children(icon, tag.name(), children)
        }
        Node::Selector(path) => {
            let label = path.iter().map(segment_label).collect::<Vec<_>>().join(".");
            let children = path
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Expr(node) => Some(node_snapshot(node)),
                    Segment::Name(_) => None,
                })
                .collect();
            Snapshot::with_children(icon, format!("{} {}", tag, label), children)
        }
        Node::Call { target, name, args } => {
            let mut children = Vec::new();
            if let Some(target) = target {
                children.push(Snapshot::with_children("⋯", "target", vec![node_snapshot(target)]));
            }
            if let Segment::Expr(name) = name {
                children.push(Snapshot::with_children("⋯", "name", vec![node_snapshot(name)]));
            }
            children.extend(args.iter().map(node_snapshot));
            Snapshot::with_children(
                icon,
                format!("{} {} ({} args)", tag, segment_label(name), args.len()),
                children,
            )
        }
        Node::Map(entries) => {
            let children = entries
                .iter()
                .map(|entry| {
                    let key = entry.key.as_deref().unwrap_or("-");
                    Snapshot::with_children("⋯", key, vec![node_snapshot(&entry.value)])
                })
                .collect();
            Snapshot::with_children(icon, format!("{} ({} entries)", tag, entries.len()), children)
        }
        Node::Statements(items) => Snapshot::with_children(icon, tag.name(), items_snapshots(items)),
        Node::Import(path) => Snapshot::leaf(icon, format!("{} {:?}", tag, path)),
        Node::If(arms) => {
            let children = arms
                .iter()
                .map(|arm| {
                    let mut children = vec![node_snapshot(&arm.condition)];
                    children.extend(items_snapshots(&arm.body));
                    Snapshot::with_children("⋯", "arm", children)
                })
                .collect();
            Snapshot::with_children(icon, format!("{} ({} arms)", tag, arms.len()), children)
        }
        Node::Var { name, value } => {
            Snapshot::with_children(icon, format!("{} {}", tag, name), vec![node_snapshot(value)])
        }
        Node::For {
            names,
            collection,
            body: then,
            otherwise,
        } => {
            let mut children = vec![node_snapshot(collection), body("then", then)];
            if let Some(otherwise) = otherwise {
                children.push(body("else", otherwise));
            }
            Snapshot::with_children(icon, format!("{} {}", tag, names.join(", ")), children)
        }
        Node::Macro { name, params, body: items } => Snapshot::with_children(
            icon,
            format!("{} {}({})", tag, name, params.join(", ")),
            items_snapshots(items),
        ),
    }
}

fn format_snapshot(snapshot: &Snapshot, prefix: &str, child_index: usize, child_count: usize) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        snapshot.icon,
        truncate(&snapshot.label, 30)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, &child_prefix, i, child_count));
    }

    output
}

/// Render a template as a treeviz string.
pub fn to_treeviz_str(template: &Template) -> String {
    let items = template.items();
    let mut output = format!("⧉ template ({} items)\n", items.len());
    let snapshots = items_snapshots(items);
    let child_count = snapshots.len();
    for (i, child) in snapshots.iter().enumerate() {
        output.push_str(&format_snapshot(child, "", i, child_count));
    }
    output
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter;

impl crate::histone::formats::registry::Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(
        &self,
        template: &Template,
    ) -> Result<String, crate::histone::formats::registry::FormatError> {
        Ok(to_treeviz_str(template))
    }

    fn description(&self) -> &str {
        "Visual tree representation with box connectors and Unicode icons"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histone::ast::{BinaryOp, IfArm};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_renders_connectors() {
        let template = Template::new(vec![
            Item::text("a"),
            Item::Node(Node::binary(BinaryOp::Add, Node::int(1), Node::int(2))),
        ]);
        assert_eq!(
            to_treeviz_str(&template),
            "⧉ template (2 items)\n\
             ├─ ↵ \"a\"\n\
             └─ ○ ADD\n\
             \x20 ├─ ○ INT 1\n\
             \x20 └─ ○ INT 2\n"
        );
    }

    #[test]
    fn test_if_arms() {
        let template = Template::new(vec![Item::Node(Node::If(vec![IfArm {
            condition: Node::name("x"),
            body: vec![Item::text("y")],
        }]))]);
        let output = to_treeviz_str(&template);
        assert!(output.contains("└─ § IF (1 arms)"));
        assert!(output.contains("  └─ ⋯ arm"));
        assert!(output.contains("    ├─ ○ SELECTOR x"));
        assert!(output.contains("    └─ ↵ \"y\""));
    }
}
