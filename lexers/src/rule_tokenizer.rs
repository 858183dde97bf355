#![deny(warnings)]

use crate::char_scanner::is_word_char;
use crate::scanner::Scanner;

/// Lexemes of a production written as text, eg: `Sum -> Sum "+" /\d+/`.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleToken {
    /// The separator between the head and the body of the rule.
    Arrow,
    /// Bare identifier.
    Word(String),
    /// Quoted text, with the quotes removed and escapes resolved.
    Quoted(String),
    /// Text between pattern delimiters plus trailing flags.
    Pattern(String, String),
    /// Any other whitespace separated chunk (eg: `+` or `(`).
    Other(String),
    /// A quote or pattern that never closes, holds the raw remainder.
    Unterminated(String),
}

pub struct RuleTokenizer {
    src: Scanner<std::vec::IntoIter<char>>,
    arrow: String,
    quotes: String,
    pattern_delim: Option<char>,
}

impl RuleTokenizer {
    pub fn new(src: &str) -> Self {
        RuleTokenizer {
            src: Scanner::from_str(src),
            arrow: "->".to_string(),
            quotes: "\"'".to_string(),
            pattern_delim: Some('/'),
        }
    }

    pub fn arrow(mut self, arrow: &str) -> Self {
        self.arrow = arrow.to_string();
        self
    }

    pub fn quotes(mut self, quotes: &str) -> Self {
        self.quotes = quotes.to_string();
        self
    }

    pub fn pattern_delimiter(mut self, delim: Option<char>) -> Self {
        self.pattern_delim = delim;
        self
    }

    fn unterminated(&mut self) -> RuleToken {
        while self.src.next().is_some() {}
        RuleToken::Unterminated(self.src.extract_string())
    }

    fn scan_quoted(&mut self, q: char) -> RuleToken {
        match self.src.scan_delimited(q) {
            Some(body) => RuleToken::Quoted(unescape(&body)),
            None => self.unterminated(),
        }
    }

    fn scan_pattern(&mut self, delim: char) -> RuleToken {
        let Some(body) = self.src.scan_delimited(delim) else {
            return self.unterminated();
        };
        // escaped delimiters belong to the rule syntax, not to the pattern
        let body = body.replace(&format!("\\{}", delim), &delim.to_string());
        while self.src.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.src.next();
        }
        RuleToken::Pattern(body, self.src.extract_string())
    }
}

fn classify(text: String) -> RuleToken {
    let is_word = text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && text.chars().all(is_word_char);
    if is_word {
        RuleToken::Word(text)
    } else {
        RuleToken::Other(text)
    }
}

// Resolve backslash escapes inside quoted literals
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl Iterator for RuleTokenizer {
    type Item = RuleToken;
    fn next(&mut self) -> Option<Self::Item> {
        self.src.ignore_ws();
        if !self.arrow.is_empty() && self.src.accept_str(&self.arrow) {
            self.src.ignore();
            return Some(RuleToken::Arrow);
        }
        let first = self.src.peek()?;
        if self.quotes.contains(first) {
            return Some(self.scan_quoted(first));
        }
        if Some(first) == self.pattern_delim {
            return Some(self.scan_pattern(first));
        }
        // plain chunk up to whitespace or a glued arrow (eg: `S->A`)
        while !self.src.at_ws() && self.src.peek().is_some() {
            if !self.arrow.is_empty() && self.src.ahead_str(&self.arrow) {
                break;
            }
            self.src.next();
        }
        let text = self.src.extract_string();
        Some(classify(text))
    }
}
