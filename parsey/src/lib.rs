#![deny(warnings)]

//! Parse input against any context-free grammar with Earley's algorithm.
//!
//! Rules can be written as text or built from `Symbol`s and terminals. Left
//! recursion, ambiguity and empty rules are all accepted. `parse` picks one
//! derivation deterministically and runs the rule valuators bottom-up.
//!
//! ```
//! let mut g = parsey::Grammar::<i64>::new();
//! g.rule_with("Sum -> Sum '+' Num", |n| {
//!     Ok(n[0].evaluated().copied().unwrap_or(0) + n[2].evaluated().copied().unwrap_or(0))
//! }).unwrap();
//! g.rule_with("Sum -> Num", |n| Ok(n[0].evaluated().copied().unwrap_or(0))).unwrap();
//! g.rule_with("Num -> /[0-9]+/", |n| Ok(n[0].token().unwrap_or("0").parse()?)).unwrap();
//! let sum = parsey::parse("1 + 2+3", &g).unwrap();
//! assert_eq!(sum.evaluated(), Some(&6));
//! ```

mod error;
pub use crate::error::{Error, Result, ValuatorError};

mod grammar;
pub use crate::grammar::{Element, Grammar, IntoRule, Rule, Symbol, Valuator};

mod rule_syntax;
pub use crate::rule_syntax::RuleSyntax;

mod items;
pub use crate::items::{Item, State};

mod parser;
pub use crate::parser::{earley, Chart, EarleyParser};

mod trees;
pub use crate::trees::{dfs, Node, Value};

mod tokenizer;
pub use crate::tokenizer::{tokenize, DefaultTokenizer, Tokenizer};

pub use regex::Regex;

use log::debug;

/// Tokenize `input` with the default tokenizer, parse it and evaluate the
/// first derivation found.
pub fn parse<V>(input: &str, grammar: &Grammar<V>) -> Result<Value<V>> {
    parse_with(input, grammar, &DefaultTokenizer::default())
}

/// Same as `parse` with a custom tokenizer.
pub fn parse_with<V, T>(input: &str, grammar: &Grammar<V>, tokenizer: &T) -> Result<Value<V>>
where
    T: Tokenizer<V> + ?Sized,
{
    let tokens = tokenizer.tokenize(input, grammar);
    debug!("tokens: {:?}", tokens);
    let chart = earley(&tokens, grammar);
    dfs(&chart, &tokens)
}
