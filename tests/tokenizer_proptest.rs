//! Property-based tests for the tokenizer
//!
//! Whatever the input and the start context, tokenizing terminates with exactly one EOF
//! and every token is a faithful slice of the source.

use histone::histone::lexing::{default_factory, tokenize_all};
use histone::histone::token::{Context, Token, TokenKind};
use proptest::prelude::*;

fn any_context() -> impl Strategy<Value = Context> {
    prop::sample::select(Context::ALL.to_vec())
}

/// Template-ish text: block delimiters and operators mixed with noise.
fn template_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("{{".to_string()),
            Just("}}".to_string()),
            Just("{{*".to_string()),
            Just("*}}".to_string()),
            Just("{{%".to_string()),
            Just("%}}".to_string()),
            Just(" ".to_string()),
            Just("'str'".to_string()),
            Just("isNot".to_string()),
            Just("1.5".to_string()),
            "[a-z]{1,5}",
            "[-+*/%<>=!&|?:,.()\\[\\]]",
            "\\PC{0,3}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn check_tokens(source: &str, tokens: &[Token]) -> Result<(), TestCaseError> {
    prop_assert!(!tokens.is_empty());
    let (last, rest) = tokens.split_last().unwrap();
    prop_assert!(last.is_eof());
    prop_assert_eq!(last.offset, None);

    let mut previous = 0;
    for token in rest {
        prop_assert!(!token.is_eof());
        prop_assert!(!token.text.is_empty());
        let offset = token.offset.unwrap();
        prop_assert!(offset > previous, "offsets must increase: {:?}", tokens);
        let start = offset - 1;
        prop_assert_eq!(&source[start..start + token.text.len()], token.text.as_str());
        previous = offset;
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_arbitrary_text_terminates(source in "\\PC{0,200}", start in any_context()) {
        let tokens = tokenize_all(&source, start).unwrap();
        check_tokens(&source, &tokens)?;
    }

    #[test]
    fn test_template_text_terminates(source in template_source(), start in any_context()) {
        let tokens = tokenize_all(&source, start).unwrap();
        check_tokens(&source, &tokens)?;
    }

    #[test]
    fn test_text_without_delimiters_is_one_fragment(source in "[a-z ]{1,50}") {
        let tokens = tokenize_all(&source, Context::Template).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::Fragment);
        prop_assert_eq!(&tokens[0].text, &source);
    }

    #[test]
    fn test_parser_never_panics(source in template_source()) {
        let _ = histone::histone::parsing::parse(default_factory(), &source);
    }
}
