#![deny(warnings)]

use crate::scanner::Scanner;

static WHITE: &[char] = &[' ', '\n', '\r', '\t'];

/// Characters that glue together into words (identifiers, numbers).
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Scanner<std::vec::IntoIter<char>> {
    pub fn from_str(source: &str) -> Self {
        Scanner::new(source.chars().collect::<Vec<_>>().into_iter())
    }
}

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    pub fn accept_char(&mut self, c: char) -> bool {
        self.accept(&c).is_some()
    }

    pub fn accept_str(&mut self, s: &str) -> bool {
        self.accept_seq(&s.chars().collect::<Vec<_>>())
    }

    pub fn ahead_str(&mut self, s: &str) -> bool {
        self.ahead(&s.chars().collect::<Vec<_>>())
    }

    pub fn skip_ws(&mut self) -> bool {
        self.skip_all(WHITE)
    }

    /// Skip whitespace and drop it from the buffer, returns if any was found.
    pub fn ignore_ws(&mut self) -> bool {
        let skipped = self.skip_ws();
        self.ignore();
        skipped
    }

    pub fn at_ws(&mut self) -> bool {
        self.peek().is_some_and(|c| WHITE.contains(&c))
    }

    /// Scan text enclosed by `delim` honoring backslash escapes. Returns the
    /// raw text without the enclosing delimiters; escapes are left in place.
    pub fn scan_delimited(&mut self, delim: char) -> Option<String> {
        let backtrack = self.pos();
        if !self.accept_char(delim) {
            return None;
        }
        let mut body = String::new();
        while let Some(n) = self.next() {
            if n == '\\' {
                body.push(n);
                if let Some(escaped) = self.next() {
                    body.push(escaped);
                }
                continue;
            }
            if n == delim {
                self.ignore();
                return Some(body);
            }
            body.push(n);
        }
        self.set_pos(backtrack);
        None
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_delimited_strings() {
        let mut s = Scanner::from_str(r"'this is a test' rest");
        assert_eq!(s.scan_delimited('\''), Some("this is a test".to_string()));
        assert_eq!(s.next(), Some(' '));

        let mut s = Scanner::from_str(r"/\d+\/x/i");
        assert_eq!(s.scan_delimited('/'), Some(r"\d+\/x".to_string()));
        assert_eq!(s.next(), Some('i'));
    }

    #[test]
    fn scan_unterminated() {
        let mut s = Scanner::from_str("'never closed");
        assert_eq!(s.scan_delimited('\''), None);
        assert_eq!(s.pos(), -1);
        assert_eq!(s.next(), Some('\''));
    }

    #[test]
    fn accept_str_backtracks() {
        let mut s = Scanner::from_str("->x");
        assert!(!s.accept_str("-x"));
        assert_eq!(s.pos(), -1);
        assert!(s.ahead_str("->"));
        assert_eq!(s.pos(), -1);
        assert!(s.accept_str("->"));
        assert_eq!(s.extract_string(), "->");
        assert_eq!(s.next(), Some('x'));
    }
}
