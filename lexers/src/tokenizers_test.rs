#![deny(warnings)]

use crate::{LiteralTokenizer, RuleToken, RuleTokenizer};

fn split(input: &str, literals: &[&str]) -> Vec<String> {
    LiteralTokenizer::new(input, literals.iter()).collect()
}

#[test]
fn literal_splits_glued_tokens() {
    assert_eq!(split("n+n+n", &["n", "+"]), vec!["n", "+", "n", "+", "n"]);
    assert_eq!(split("1 + 22*3", &["+", "*"]), vec!["1", "+", "22", "*", "3"]);
    assert_eq!(split("a<=b", &["<", "<="]), vec!["a", "<=", "b"]);
}

#[test]
fn literal_respects_word_boundaries() {
    assert_eq!(split("iffy if x", &["if"]), vec!["iffy", "if", "x"]);
    assert_eq!(split("(if)", &["if", "(", ")"]), vec!["(", "if", ")"]);
}

#[test]
fn whitespace_tokenizer() {
    let tokens: Vec<_> = LiteralTokenizer::whitespace("  a  bb\tc\n").collect();
    assert_eq!(tokens, vec!["a", "bb", "c"]);
    assert_eq!(LiteralTokenizer::whitespace("").next(), None);
    assert_eq!(LiteralTokenizer::whitespace(" \t ").next(), None);
}

#[test]
fn rule_tokens() {
    let tokens: Vec<_> = RuleTokenizer::new(r#"Sum -> Sum "+" /\d+/i"#).collect();
    assert_eq!(tokens, vec![
        RuleToken::Word("Sum".to_string()),
        RuleToken::Arrow,
        RuleToken::Word("Sum".to_string()),
        RuleToken::Quoted("+".to_string()),
        RuleToken::Pattern(r"\d+".to_string(), "i".to_string()),
    ]);
}

#[test]
fn rule_tokens_glued_arrow_and_punctuation() {
    let tokens: Vec<_> = RuleTokenizer::new("S->A 'b c' + (").collect();
    assert_eq!(tokens, vec![
        RuleToken::Word("S".to_string()),
        RuleToken::Arrow,
        RuleToken::Word("A".to_string()),
        RuleToken::Quoted("b c".to_string()),
        RuleToken::Other("+".to_string()),
        RuleToken::Other("(".to_string()),
    ]);
}

#[test]
fn rule_tokens_escapes() {
    let tokens: Vec<_> = RuleTokenizer::new(r#"A -> "a\"b" /a\/b/"#).collect();
    assert_eq!(tokens[2], RuleToken::Quoted("a\"b".to_string()));
    assert_eq!(tokens[3], RuleToken::Pattern("a/b".to_string(), String::new()));
}

#[test]
fn rule_tokens_unterminated() {
    let tokens: Vec<_> = RuleTokenizer::new(r#"A -> "abc"#).collect();
    assert_eq!(tokens.last(), Some(&RuleToken::Unterminated("\"abc".to_string())));
}

#[test]
fn rule_tokens_custom_syntax() {
    let tokens: Vec<_> = RuleTokenizer::new("A ::= b /c")
        .arrow("::=")
        .pattern_delimiter(None)
        .collect();
    assert_eq!(tokens, vec![
        RuleToken::Word("A".to_string()),
        RuleToken::Arrow,
        RuleToken::Word("b".to_string()),
        RuleToken::Other("/c".to_string()),
    ]);
}
