#![deny(warnings)]

use crate::error::{Error, Result};
use crate::grammar::{Element, Grammar, Rule, Symbol};
use lexers::{RuleToken, RuleTokenizer};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Lexical convention for rules written as text.
///
/// With the default convention `Sum -> Sum "+" /\d+/i` reads as: head `Sum`,
/// then the symbol `Sum`, the literal `+` and a case-insensitive pattern.
/// Identifiers are symbols, quoted text is a literal and text between
/// pattern delimiters is a regex. Other bare chunks (`+`, `(`) become
/// literals unless `bare_literals(false)` is set.
#[derive(Clone, Debug)]
pub struct RuleSyntax {
    arrow: String,
    quotes: String,
    pattern_delimiter: Option<char>,
    bare_literals: bool,
}

impl Default for RuleSyntax {
    fn default() -> Self {
        RuleSyntax {
            arrow: "->".to_string(),
            quotes: "\"'".to_string(),
            pattern_delimiter: Some('/'),
            bare_literals: true,
        }
    }
}

impl RuleSyntax {
    pub fn arrow(mut self, arrow: impl Into<String>) -> Self {
        self.arrow = arrow.into();
        self
    }

    /// Characters that may open (and close) a literal.
    pub fn quotes(mut self, quotes: impl Into<String>) -> Self {
        self.quotes = quotes.into();
        self
    }

    /// `None` disables patterns in text rules.
    pub fn pattern_delimiter(mut self, delimiter: Option<char>) -> Self {
        self.pattern_delimiter = delimiter;
        self
    }

    pub fn bare_literals(mut self, allow: bool) -> Self {
        self.bare_literals = allow;
        self
    }

    /// Build a rule from its textual form.
    ///
    /// Names resolve against the symbols already in `grammar`; unknown names
    /// create new symbols, shared by every mention within this rule.
    pub fn parse_rule<V>(&self, text: &str, grammar: &Grammar<V>) -> Result<Rule<V>> {
        let tokens: Vec<RuleToken> = RuleTokenizer::new(text)
            .arrow(&self.arrow)
            .quotes(&self.quotes)
            .pattern_delimiter(self.pattern_delimiter)
            .collect();
        let Some(arrow) = tokens.iter().position(|t| *t == RuleToken::Arrow) else {
            return Err(Error::syntax(text, format!("missing `{}` separator", self.arrow)));
        };

        let mut minted: HashMap<String, Symbol> = HashMap::new();
        let mut resolve = |name: &str| -> Symbol {
            if let Some(symbol) = grammar.symbol(name) {
                return symbol.clone();
            }
            minted.entry(name.to_string()).or_insert_with(|| Symbol::new(name)).clone()
        };

        let lhs = match &tokens[..arrow] {
            [RuleToken::Word(name)] => resolve(name.as_str()),
            [] => return Err(Error::syntax(text, "missing rule head")),
            _ => return Err(Error::syntax(text, "rule head must be a single symbol name")),
        };

        let mut rhs = Vec::new();
        for token in &tokens[arrow + 1..] {
            let element = match token {
                RuleToken::Word(name) => Element::Symbol(resolve(name.as_str())),
                // no token is ever empty
                RuleToken::Quoted(literal) if literal.is_empty() => {
                    return Err(Error::syntax(text, "empty literal"));
                }
                RuleToken::Quoted(literal) => Element::Literal(literal.clone()),
                RuleToken::Pattern(body, flags) => Element::Pattern(self.pattern(text, body, flags)?),
                RuleToken::Other(literal) if self.bare_literals => Element::Literal(literal.clone()),
                RuleToken::Other(chunk) => {
                    return Err(Error::syntax(text, format!("unexpected `{}`", chunk)));
                }
                RuleToken::Arrow => {
                    return Err(Error::syntax(text, format!("unexpected second `{}`", self.arrow)));
                }
                RuleToken::Unterminated(rest) => {
                    return Err(Error::syntax(text, format!("unterminated `{}`", rest)));
                }
            };
            rhs.push(element);
        }
        Ok(Rule::new(lhs, rhs))
    }

    fn pattern(&self, text: &str, body: &str, flags: &str) -> Result<Regex> {
        let mut builder = RegexBuilder::new(body);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                // unicode is always on, global and sticky mean nothing for a single token
                'u' | 'g' | 'y' => (),
                other => {
                    return Err(Error::syntax(text, format!("unknown pattern flag `{}`", other)));
                }
            }
        }
        builder
            .build()
            .map_err(|e| Error::syntax(text, format!("invalid pattern /{}/: {}", body, e)))
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::RuleSyntax;
    use crate::error::Error;
    use crate::grammar::{Element, Grammar};

    fn syntax_error(g: &Grammar, rule: &str) -> String {
        match g.syntax().parse_rule(rule, g) {
            Err(Error::Syntax { reason, .. }) => reason,
            Err(e) => panic!("unexpected error {}", e),
            Ok(r) => panic!("unexpected rule {}", r),
        }
    }

    #[test]
    fn parse_rule_elements() {
        let g: Grammar = Grammar::new();
        let rule = g.syntax().parse_rule(r#"Sum -> Sum "+" /\d+/ 'x' ("#, &g).unwrap();
        assert_eq!(rule.lhs().name(), Some("Sum"));
        assert_eq!(rule.rhs().len(), 5);
        // head and body mentions of Sum are the same symbol
        assert_eq!(rule.rhs()[0], Element::Symbol(rule.lhs().clone()));
        assert_eq!(rule.rhs()[1], Element::from("+"));
        assert!(rule.rhs()[2].matches("42"));
        assert_eq!(rule.rhs()[3], Element::from("x"));
        assert_eq!(rule.rhs()[4], Element::from("("));
        assert_eq!(rule.to_string(), r#"Sum -> Sum "+" /\d+/ "x" "(""#);
    }

    #[test]
    fn parse_rule_reuses_grammar_symbols() {
        let mut g: Grammar = Grammar::new();
        let first = g.rule("S -> A 'b'").unwrap();
        let second = g.rule("A -> 'a' S").unwrap();
        assert_eq!(first.rhs()[0], Element::Symbol(second.lhs().clone()));
        assert_eq!(second.rhs()[1], Element::Symbol(first.lhs().clone()));
        assert!(g.symbols().is_ok());
    }

    #[test]
    fn parse_rule_epsilon_and_glued_arrow() {
        let g: Grammar = Grammar::new();
        assert!(g.syntax().parse_rule("A ->", &g).unwrap().is_epsilon());
        let rule = g.syntax().parse_rule("A->B", &g).unwrap();
        assert_eq!(rule.to_string(), "A -> B");
    }

    #[test]
    fn parse_rule_pattern_flags() {
        let g: Grammar = Grammar::new();
        let rule = g.syntax().parse_rule("W -> /abc/i /a.b/s", &g).unwrap();
        assert!(rule.rhs()[0].matches("ABC"));
        assert!(rule.rhs()[1].matches("a\nb"));
        let rule = g.syntax().parse_rule(r"P -> /a\/b/", &g).unwrap();
        assert!(rule.rhs()[0].matches("a/b"));
        assert!(syntax_error(&g, "W -> /abc/q").contains("flag"));
        assert!(syntax_error(&g, "W -> /a(b/").contains("invalid pattern"));
    }

    #[test]
    fn parse_rule_errors() {
        let g: Grammar = Grammar::new();
        assert!(syntax_error(&g, "S = a b").contains("->"));
        assert!(syntax_error(&g, "-> a b").contains("head"));
        assert!(syntax_error(&g, "S T -> a").contains("head"));
        assert!(syntax_error(&g, "'S' -> a").contains("head"));
        assert!(syntax_error(&g, "S -> a -> b").contains("second"));
        assert!(syntax_error(&g, "S -> 'never closed").contains("unterminated"));
        assert!(syntax_error(&g, "S -> ''").contains("empty literal"));
        assert!(syntax_error(&g, "S -> a \"\" b").contains("empty literal"));
    }

    #[test]
    fn custom_syntax() {
        let syntax = RuleSyntax::default()
            .arrow("::=")
            .quotes("`")
            .pattern_delimiter(None)
            .bare_literals(false);
        let g: Grammar = Grammar::with_syntax(syntax);
        let rule = g.syntax().parse_rule("Expr ::= Expr `+` Term", &g).unwrap();
        assert_eq!(rule.to_string(), r#"Expr -> Expr "+" Term"#);
        assert!(syntax_error(&g, "Expr ::= Expr + Term").contains("unexpected `+`"));
        assert!(syntax_error(&g, "Expr -> Term").contains("::="));
    }
}
