#![deny(warnings)]

/// Error type returned by valuators. Any standard error converts into it
/// with `?`, and so do plain strings.
pub type ValuatorError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rule written as text could not be understood.
    #[error("syntax error in rule {rule:?}: {reason}")]
    Syntax { rule: String, reason: String },

    /// Two different symbols share a name, so lookup by name is ambiguous.
    #[error("duplicate symbol name: {0}")]
    DuplicateSymbolName(String),

    /// The input is not in the language of the grammar.
    #[error("no parse: {0}")]
    NoParse(String),

    /// A valuator failed while evaluating the parse tree.
    #[error(transparent)]
    Valuator(ValuatorError),
}

impl Error {
    pub(crate) fn syntax(rule: &str, reason: impl Into<String>) -> Self {
        Error::Syntax { rule: rule.to_string(), reason: reason.into() }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
