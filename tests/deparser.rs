//! Deparser tests: templates are parsed with the default table, then rendered back.

use histone::histone::config::Loader;
use histone::histone::formats::{deparse, Deparser};
use histone::histone::parsing::parse_template;
use serde_json::json;

fn render(source: &str) -> String {
    let template = parse_template(source).unwrap();
    Deparser::default().deparse_template(&template)
}

#[test]
fn test_binary_operation_is_parenthesized() {
    let out = deparse(&json!([[9, [101, 1], [101, 2]]])).unwrap();
    assert!(out.contains("(1 + 2)"));
}

#[test]
fn test_envelope_is_transparent() {
    let root = json!(["x ", [1001, "a", [10, [101, 5], [105, ["b", "c"]]]], [104, [16], [103, "y"]]]);
    let wrapped = json!([["HISTONE", []], root.clone()]);
    assert_eq!(deparse(&wrapped).unwrap(), deparse(&root).unwrap());
}

#[test]
fn test_if_chain() {
    insta::assert_snapshot!(
        render("{{if a > 1}}big{{elseif a}}some{{else}}none{{/if}}"),
        @r"
    if ((a > 1)) {
    big}
    if (a) {
    some}
    if (true) {
    none}
    "
    );
}

#[test]
fn test_for_with_else() {
    insta::assert_snapshot!(
        render("{{for k : v in items}}{{v}}{{else}}empty{{/for}}"),
        @r"
    for (k,v in items) {
      v
    } else {
    empty}
    "
    );
}

#[test]
fn test_macro_and_statements() {
    insta::assert_snapshot!(
        render("{{macro m(a, b)}}{{var x = a + b}}{{a.b.c(1, 'x')}}{{/macro}}"),
        @r"
    macro m(a, b) {
      x = (a + b);
      a.b.c(1, x);
    }
    "
    );
}

#[test]
fn test_expressions_render_inline() {
    assert_eq!(render("{{-x}}"), "-(x)\n");
    assert_eq!(render("{{!a ? 'y' : 'n'}}"), "(!(a)) ? (y) : (n);\n");
    assert_eq!(render("{{['k': 1, 2]}}"), "[k : 1, 2]\n");
    assert_eq!(render("{{import 'lib'}}"), "import \"lib\";\n");
    assert_eq!(render("{{a[0].b}}"), "a.0.b\n");
}

#[test]
fn test_block_var_closes_before_semicolon() {
    assert_eq!(render("{{var x}}a{{y}}{{/var}}"), "x = ay;\n");
    assert_eq!(render("{{call wrap()}}<b>{{name}}</b>{{/call}}"), "wrap(<b>name</b>);\n");
}

#[test]
fn test_indent_comes_from_configuration() {
    let config = Loader::new()
        .with_toml("[deparser]\nindent = \"    \"\n")
        .build()
        .unwrap();
    let template = parse_template("{{macro m}}{{1}}{{/macro}}").unwrap();
    assert_eq!(
        Deparser::new(&config.deparser).deparse_template(&template),
        "macro m() {\n    1\n}\n"
    );
}

#[test]
fn test_malformed_tree_is_an_error() {
    assert!(deparse(&json!([[1000, "not arms"]])).is_err());
    assert!(deparse(&json!("not an array")).is_err());
}
