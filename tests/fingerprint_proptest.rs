//! Property-based tests for structural fingerprints
//!
//! The fingerprint is a sum over leaves, so any reordering of siblings, at any depth,
//! keeps both the hash and the node count.

use histone::histone::formats::{fingerprint, node_count, Fingerprint};
use histone::histone::parsing::parse_template;
use proptest::prelude::*;
use serde_json::Value;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-zé ]{0,8}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Nested arrays of leaves, shaped like tagged-array trees.
fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Value::Array)
    })
}

fn reverse_all(value: &Value) -> Value {
    match value {
        Value::Array(elements) => Value::Array(elements.iter().rev().map(reverse_all).collect()),
        other => other.clone(),
    }
}

fn count_by_hand(value: &Value) -> usize {
    match value {
        Value::Array(elements) => 1 + elements.iter().map(count_by_hand).sum::<usize>(),
        _ => 1,
    }
}

proptest! {
    #[test]
    fn test_shuffled_siblings_keep_fingerprint(
        (items, shuffled) in prop::collection::vec(tree(), 0..8).prop_flat_map(|items| {
            let shuffled = Just(items.clone()).prop_shuffle();
            (Just(items), shuffled)
        })
    ) {
        let root = Value::Array(items);
        let permuted = Value::Array(shuffled);
        prop_assert_eq!(fingerprint(&root), fingerprint(&permuted));
        prop_assert_eq!(node_count(&root), node_count(&permuted));
    }

    #[test]
    fn test_reordering_at_every_depth_keeps_fingerprint(root in tree()) {
        let reversed = reverse_all(&root);
        prop_assert_eq!(Fingerprint::of_value(&root), Fingerprint::of_value(&reversed));
        prop_assert_eq!(node_count(&root), count_by_hand(&root));
    }

    #[test]
    fn test_parsed_template_matches_its_wire_form(a in 0u32..1000, b in "z[a-z]{0,5}") {
        let source = format!("x {{{{{} + {}}}}} y", a, b);
        let template = parse_template(&source).unwrap();
        prop_assert_eq!(
            Fingerprint::of_items(template.items()),
            Fingerprint::of_value(&template.to_value())
        );
    }
}
