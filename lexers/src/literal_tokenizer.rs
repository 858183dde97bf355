#![deny(warnings)]

use crate::char_scanner::is_word_char;
use crate::scanner::Scanner;

/// Splits input on whitespace and around a set of known literals.
///
/// Literals are tried longest first. A literal that starts (or ends) with a
/// word character only matches on a word boundary, so the literal `if` does
/// not split `iffy`. Any other run of characters becomes a token on its own.
pub struct LiteralTokenizer {
    src: Scanner<std::vec::IntoIter<char>>,
    literals: Vec<Vec<char>>,
    // last char emitted was part of a word
    after_word: bool,
}

impl LiteralTokenizer {
    pub fn new<L, S>(src: &str, literals: L) -> Self
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut literals: Vec<Vec<char>> = literals
            .into_iter()
            .map(|l| l.as_ref().chars().collect::<Vec<_>>())
            .filter(|l| !l.is_empty())
            .collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        literals.dedup();
        LiteralTokenizer { src: Scanner::from_str(src), literals, after_word: false }
    }

    /// Tokenize on whitespace only.
    pub fn whitespace(src: &str) -> Self {
        LiteralTokenizer::new(src, std::iter::empty::<&str>())
    }

    // Find the literal that would match at the cursor, respecting word edges
    fn literal_ahead(&mut self, after_word: bool) -> Option<usize> {
        for (idx, literal) in self.literals.iter().enumerate() {
            let starts_word = literal.first().copied().is_some_and(is_word_char);
            let ends_word = literal.last().copied().is_some_and(is_word_char);
            if starts_word && after_word {
                continue;
            }
            let backtrack = self.src.pos();
            if self.src.accept_seq(literal) {
                let boundary = !ends_word || !self.src.peek().is_some_and(is_word_char);
                self.src.set_pos(backtrack);
                if boundary {
                    return Some(idx);
                }
            }
        }
        None
    }
}

impl Iterator for LiteralTokenizer {
    type Item = String;
    fn next(&mut self) -> Option<Self::Item> {
        if self.src.ignore_ws() {
            self.after_word = false;
        }
        if let Some(idx) = self.literal_ahead(self.after_word) {
            let literal = self.literals[idx].clone();
            self.src.accept_seq(&literal);
            self.after_word = literal.last().copied().is_some_and(is_word_char);
            return Some(self.src.extract_string());
        }
        let mut last = None;
        while let Some(c) = self.src.peek() {
            if self.src.at_ws() {
                break;
            }
            let after_word = last.is_some_and(is_word_char);
            if last.is_some() && self.literal_ahead(after_word).is_some() {
                break;
            }
            self.src.next();
            last = Some(c);
        }
        let token = self.src.extract_string();
        if token.is_empty() {
            return None;
        }
        self.after_word = last.is_some_and(is_word_char);
        Some(token)
    }
}
