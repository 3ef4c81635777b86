//! Parser integration tests over the default token table
//!
//! Trees are compared in their wire form, which is what downstream tools consume.

use histone::histone::ast::{wire, Item, Node, Segment};
use histone::histone::lexing::default_factory;
use histone::histone::parsing::{parse_expression, parse_template, ParseError};
use histone::histone::HistoneError;
use rstest::rstest;
use serde_json::{json, Value};

fn wire(source: &str) -> Value {
    parse_template(source)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
        .to_value()
}

fn syntax_error(source: &str) -> ParseError {
    match parse_template(source) {
        Err(HistoneError::Parse(err)) => err,
        other => panic!("expected a syntax error for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_mixed_text_and_expressions() {
    assert_eq!(
        wire("a {{true}} b {{1+2}} c {{'русский'}} d"),
        json!(["a ", [16], " b ", [9, [101, 1], [101, 2]], " c ", [103, "русский"], " d"])
    );
}

#[test]
fn test_ternary_without_else_has_two_children() {
    let value = wire("{{a ? b}}");
    assert_eq!(
        value,
        json!([[104, [105, ["a"]], [105, ["b"]]]])
    );
    assert_eq!(value[0].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_bare_expression_entry_point() {
    let node = parse_expression(default_factory(), "a ? b").unwrap();
    assert_eq!(
        wire::node_to_value(&node),
        json!([104, [105, ["a"]], [105, ["b"]]])
    );
}

#[test]
fn test_method_call_splits_the_path() {
    let template = parse_template("{{a.b.c()}}").unwrap();
    assert_eq!(
        template.items(),
        &[Item::Node(Node::call(
            Some(Node::Selector(vec![Segment::name("a"), Segment::name("b")])),
            Segment::name("c"),
            vec![],
        ))]
    );
    assert_eq!(template.to_value(), json!([[106, [105, ["a", "b"]], "c", []]]));
}

#[test]
fn test_unclosed_if_references_the_close_tag() {
    let err = syntax_error("{{if x}}y");
    assert_eq!(err.expected, "\"{{/if}}\"");
    assert_eq!(err.found, "end of input");
    assert!(err.to_string().contains("{{/if}}"));
}

#[rstest]
#[case("{{[1 + 2: 3]}}")]
#[case("{{[a.b: 3]}}")]
#[case("{{[f(): 3]}}")]
fn test_complex_map_keys_are_rejected(#[case] source: &str) {
    let err = syntax_error(source);
    assert_eq!(err.expected, "string, integer or name as map key");
    assert_eq!(err.found, ":");
}

#[rstest]
#[case("{{1 + 2 * 3}}", json!([[9, [101, 1], [11, [101, 2], [101, 3]]]]))]
#[case("{{(1 + 2) * 3}}", json!([[11, [9, [101, 1], [101, 2]], [101, 3]]]))]
#[case("{{a or b and c}}", json!([[1, [105, ["a"]], [2, [105, ["b"]], [105, ["c"]]]]]))]
#[case("{{a || b && c}}", json!([[1, [105, ["a"]], [2, [105, ["b"]], [105, ["c"]]]]]))]
#[case("{{a is b}}", json!([[3, [105, ["a"]], [105, ["b"]]]]))]
#[case("{{a isNot b}}", json!([[4, [105, ["a"]], [105, ["b"]]]]))]
#[case("{{not a}}", json!([[15, [105, ["a"]]]]))]
#[case("{{10 mod 3}}", json!([[13, [101, 10], [101, 3]]]))]
#[case("{{-x.y}}", json!([[14, [105, ["x", "y"]]]]))]
#[case("{{a ? 1 : 2}}", json!([[104, [105, ["a"]], [101, 1], [101, 2]]]))]
#[case("{{1.25}}", json!([[102, 1.25]]))]
#[case("{{null}}", json!([[18]]))]
fn test_expressions(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(wire(source), expected);
}

#[rstest]
#[case("{{var x = 1}}", json!([[1001, "x", [101, 1]]]))]
#[case("{{var x}}hi{{/var}}", json!([[1001, "x", [108, ["hi"]]]]))]
#[case("{{import 'lib.tpl'}}", json!([[109, "lib.tpl"]]))]
#[case(
    "{{macro m(a, b)}}{{a}}{{/macro}}",
    json!([[1003, "m", ["a", "b"], [[105, ["a"]]]]])
)]
#[case(
    "{{for v in list}}{{v}}{{/for}}",
    json!([[1002, ["v"], [105, ["list"]], [[[105, ["v"]]]]]])
)]
#[case(
    "{{for k : v in map}}x{{else}}empty{{/for}}",
    json!([[1002, ["k", "v"], [105, ["map"]], [["x"], ["empty"]]]])
)]
#[case(
    "{{if a}}1{{elseif b}}2{{else}}3{{/if}}",
    json!([[1000, [[[105, ["a"]], ["1"]], [[105, ["b"]], ["2"]], [[16], ["3"]]]]])
)]
#[case(
    "{{call wrap(1)}}body{{/call}}",
    json!([[106, null, "wrap", [[101, 1], [108, ["body"]]]]])
)]
fn test_block_constructs(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(wire(source), expected);
}

#[test]
fn test_comments_and_literals() {
    assert_eq!(
        wire("a{{* {{* nested *}} *}}b{{% {{x}} %}}c"),
        json!(["a", "b", " {{x}} ", "c"])
    );
}

#[test]
fn test_error_points_at_the_line() {
    let err = syntax_error("line one\nline two\n{{if }}");
    assert_eq!(err.line, 3);
    assert_eq!(err.found, "}}");
}
