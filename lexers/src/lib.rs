#![deny(warnings)]

mod scanner;
mod char_scanner;
mod literal_tokenizer;
mod rule_tokenizer;

pub use scanner::Scanner;
pub use char_scanner::is_word_char;
pub use literal_tokenizer::LiteralTokenizer;
pub use rule_tokenizer::{RuleToken, RuleTokenizer};

#[cfg(test)]
mod scanner_test;
#[cfg(test)]
mod tokenizers_test;
