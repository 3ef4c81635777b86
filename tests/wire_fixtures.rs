//! Wire format tests: decoding fixtures, re-encoding parsed templates and fingerprints.

use histone::histone::ast::{wire, Template};
use histone::histone::formats::{fingerprint, node_count, Deparser, Fingerprint};
use histone::histone::parsing::parse_template;
use rstest::rstest;
use serde_json::{json, Value};
use std::fs;

fn read_fixture(name: &str) -> Value {
    let path = format!("tests/fixtures/{}", name);
    let text = fs::read_to_string(&path).expect("Failed to read fixture");
    if name.ends_with(".yaml") {
        wire::from_yaml_str(&text).unwrap()
    } else {
        wire::from_json_str(&text).unwrap()
    }
}

#[rstest]
#[case("a {{true}} b {{1+2}} c {{'русский'}} d")]
#[case("{{if a > 1}}big{{elseif a}}some{{else}}none{{/if}}")]
#[case("{{for k : v in items}}{{v.name}}{{else}}empty{{/for}}")]
#[case("{{macro m(a, b)}}{{a[b].c(1, 2.50, [x: null])}}{{/macro}}")]
#[case("{{var x}}inner {{y ? 1 : -2}}{{/var}}{{call f()}}body{{/call}}")]
#[case("{{import 'lib.tpl'}}{{% raw {{x}} %}}{{* gone *}}")]
fn test_parsed_templates_round_trip(#[case] source: &str) {
    let items = parse_template(source).unwrap().into_items();
    let value = wire::to_value(&items);
    assert_eq!(wire::from_value(&value).unwrap(), items);
}

#[test]
fn test_decimal_digits_survive() {
    let value = parse_template("{{2.50}}").unwrap().to_value();
    assert_eq!(value.to_string(), "[[102,2.50]]");
}

#[test]
fn test_enveloped_fixture() {
    let value = read_fixture("greeting.json");
    let template = Template::from_value(&value).unwrap();
    assert_eq!(template.signature(), Some(&json!({"source": "greeting.tpl"})));
    assert_eq!(template.items().len(), 5);
    assert_eq!(template.to_value(), value);

    insta::assert_snapshot!(
        Deparser::default().deparse_template(&template),
        @r#"
    Hello, user.name
    !
    if ((user.age >= 18)) {
    adult}
    if (true) {
    minor}
    total = (2.50 + (3 * price));
    "#
    );
}

#[test]
fn test_yaml_fixture_matches_parsed_template() {
    let value = read_fixture("loop.yaml");
    let parsed = parse_template("{{for key : value in items}}{{key}}={{value}}{{else}}nothing{{/for}}")
        .unwrap()
        .to_value();
    assert_eq!(value, parsed);
}

#[test]
fn test_fingerprint_ignores_sibling_order() {
    let a = json!([[9, [101, 1], [101, 2]]]);
    let b = json!([[9, [101, 2], [101, 1]]]);
    assert_eq!(fingerprint(&a), fingerprint(&b));
    assert_eq!(node_count(&a), 9);
}

#[test]
fn test_fingerprint_of_envelope_matches_root() {
    let value = read_fixture("greeting.json");
    let root = wire::unwrap_envelope(&value);
    assert_eq!(Fingerprint::of_value(&value), Fingerprint::of_value(root));
}

#[test]
fn test_fingerprint_of_parsed_template() {
    let items = parse_template("{{1+2}}").unwrap().into_items();
    let print = Fingerprint::of_items(&items);
    assert_eq!(print, Fingerprint::of_value(&json!([[9, [101, 1], [101, 2]]])));
    assert_eq!(print.nodes, 9);
}
