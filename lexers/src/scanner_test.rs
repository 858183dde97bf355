#![deny(warnings)]

use crate::scanner::Scanner;

#[test]
fn scanner_walks_to_the_end() {
    let mut s = Scanner::from_str("ab@");
    assert_eq!(s.curr(), None);
    assert_eq!(s.peek(), Some('a'));
    assert_eq!(s.next(), Some('a'));
    assert_eq!(s.curr(), Some('a'));
    assert_eq!(s.next(), Some('b'));
    assert_eq!(s.next(), Some('@'));
    assert_eq!(s.next(), None);
    assert_eq!(s.next(), None);
    assert_eq!(s.view(), &['a', 'b', '@']);
}

#[test]
fn scanner_backtracks() {
    let mut s = Scanner::from_str("S -> A");
    let start = s.pos();
    assert!(s.accept_char('S'));
    assert!(!s.accept_char('x'));
    assert!(s.set_pos(start));
    assert_eq!(s.next(), Some('S'));
    // out of range positions are refused
    assert!(!s.set_pos(10));
    assert!(!s.set_pos(-2));
    assert_eq!(s.curr(), Some('S'));
}

#[test]
fn scanner_extract() {
    let mut s = Scanner::from_str("Sum  -> Num");
    while s.peek().is_some_and(|c| c.is_alphabetic()) {
        s.next();
    }
    assert_eq!(s.extract_string(), "Sum");
    assert!(s.ignore_ws());
    assert!(!s.ignore_ws());
    assert!(s.accept_str("->"));
    assert_eq!(s.extract_string(), "->");
    assert!(s.at_ws());
    assert!(s.skip_ws());
    s.ignore();
    assert_eq!(s.view(), &[] as &[char]);
    assert!(s.accept_str("Num"));
    assert_eq!(s.extract_string(), "Num");
    assert_eq!(s.peek(), None);
}

#[test]
fn scanner_generic_items() {
    let mut s = Scanner::new(vec![1, 2, 3, 4].into_iter());
    assert!(s.accept_seq(&[1, 2]));
    assert!(!s.accept_seq(&[3, 3]));
    assert!(s.ahead(&[3, 4]));
    assert_eq!(s.extract(), vec![1, 2]);
    assert_eq!(s.accept(&4), None);
    assert_eq!(s.accept_any(&[5, 3]), Some(3));
    assert!(s.skip_all(&[4]));
    assert_eq!(s.view(), &[3, 4]);
    assert!(!s.skip_all(&[4]));
}
