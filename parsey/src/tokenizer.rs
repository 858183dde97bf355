#![deny(warnings)]

use crate::grammar::Grammar;
use lexers::LiteralTokenizer;

/// Turns input text into the tokens terminals are matched against.
///
/// Any `Fn(&str, &Grammar<V>) -> Vec<String>` is a tokenizer, so custom
/// splitting can be plugged into `parse_with` as a closure.
pub trait Tokenizer<V> {
    fn tokenize(&self, input: &str, grammar: &Grammar<V>) -> Vec<String>;
}

impl<V, F> Tokenizer<V> for F
where
    F: Fn(&str, &Grammar<V>) -> Vec<String>,
{
    fn tokenize(&self, input: &str, grammar: &Grammar<V>) -> Vec<String> {
        self(input, grammar)
    }
}

/// Splits on whitespace and, unless disabled, around the literal terminals
/// of the grammar so `1+2` yields `1`, `+`, `2` when `+` is a literal.
#[derive(Clone, Debug)]
pub struct DefaultTokenizer {
    split_literals: bool,
}

impl Default for DefaultTokenizer {
    fn default() -> Self {
        DefaultTokenizer { split_literals: true }
    }
}

impl DefaultTokenizer {
    pub fn split_literals(mut self, split: bool) -> Self {
        self.split_literals = split;
        self
    }
}

impl<V> Tokenizer<V> for DefaultTokenizer {
    fn tokenize(&self, input: &str, grammar: &Grammar<V>) -> Vec<String> {
        if self.split_literals {
            LiteralTokenizer::new(input, grammar.literals()).collect()
        } else {
            LiteralTokenizer::whitespace(input).collect()
        }
    }
}

/// Tokenize with the `DefaultTokenizer`.
pub fn tokenize<V>(input: &str, grammar: &Grammar<V>) -> Vec<String> {
    DefaultTokenizer::default().tokenize(input, grammar)
}

///////////////////////////////////////////////////////////////////////////////
