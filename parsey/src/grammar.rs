#![deny(warnings)]

use crate::error::{Error, Result, ValuatorError};
use crate::rule_syntax::RuleSyntax;
use crate::trees::Value;
use log::trace;
use regex::Regex;
use std::collections::btree_map::{BTreeMap, Entry};
use std::sync::Arc;
use std::{fmt, hash, iter};

struct SymbolData {
    name: Option<String>,
}

/// A non-terminal of the grammar.
///
/// Symbols are compared by identity: cloning a `Symbol` yields the same
/// symbol, while two symbols created separately are different even when they
/// carry the same name. The name is only used for display and for the
/// by-name lookups done when parsing rules written as text.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(Arc::new(SymbolData { name: Some(name.into()) }))
    }

    pub fn anonymous() -> Self {
        Symbol(Arc::new(SymbolData { name: None }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl hash::Hash for Symbol {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name().unwrap_or("<anonymous>"))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

///////////////////////////////////////////////////////////////////////////////

/// One entry in the body of a rule.
#[derive(Clone, Debug)]
pub enum Element {
    Symbol(Symbol),
    /// Terminal matching a token exactly.
    Literal(String),
    /// Terminal matching any token the pattern finds a match in.
    Pattern(Regex),
}

impl Element {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Element::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Element::Symbol(_))
    }

    /// Check if a terminal accepts the token. Symbols never match directly.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Element::Symbol(_) => false,
            Element::Literal(literal) => literal == token,
            Element::Pattern(pattern) => pattern.is_match(token),
        }
    }
}

// Patterns are equal if they were written the same way
impl PartialEq for Element {
    fn eq(&self, other: &Element) -> bool {
        match (self, other) {
            (Element::Symbol(a), Element::Symbol(b)) => a == b,
            (Element::Literal(a), Element::Literal(b)) => a == b,
            (Element::Pattern(a), Element::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Symbol(symbol) => write!(f, "{}", symbol),
            Element::Literal(literal) => write!(f, "{:?}", literal),
            Element::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

impl From<Symbol> for Element {
    fn from(symbol: Symbol) -> Self { Element::Symbol(symbol) }
}

impl From<&Symbol> for Element {
    fn from(symbol: &Symbol) -> Self { Element::Symbol(symbol.clone()) }
}

impl From<&str> for Element {
    fn from(literal: &str) -> Self { Element::Literal(literal.to_string()) }
}

impl From<String> for Element {
    fn from(literal: String) -> Self { Element::Literal(literal) }
}

impl From<Regex> for Element {
    fn from(pattern: Regex) -> Self { Element::Pattern(pattern) }
}

///////////////////////////////////////////////////////////////////////////////

/// Semantic action of a rule. Receives one value per body element and
/// returns the value of the rule's head for that derivation.
pub type Valuator<V> = Arc<dyn Fn(Vec<Value<V>>) -> Result<V, ValuatorError> + Send + Sync>;

/// A production `lhs -> rhs`. Rules are immutable once built.
pub struct Rule<V = ()> {
    lhs: Symbol,
    rhs: Vec<Element>,
    valuator: Option<Valuator<V>>,
}

impl<V> Rule<V> {
    pub fn new(lhs: Symbol, rhs: impl IntoIterator<Item = Element>) -> Self {
        Rule { lhs, rhs: rhs.into_iter().collect(), valuator: None }
    }

    pub fn with_valuator<F>(mut self, valuator: F) -> Self
    where
        F: Fn(Vec<Value<V>>) -> Result<V, ValuatorError> + Send + Sync + 'static,
    {
        self.valuator = Some(Arc::new(valuator));
        self
    }

    pub fn lhs(&self) -> &Symbol {
        &self.lhs
    }

    pub fn rhs(&self) -> &[Element] {
        &self.rhs
    }

    pub fn valuator(&self) -> Option<&Valuator<V>> {
        self.valuator.as_ref()
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl<V> fmt::Display for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for element in &self.rhs {
            write!(f, " {}", element)?;
        }
        Ok(())
    }
}

impl<V> fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Anything `Grammar::rule` accepts: a built `Rule`, a `(lhs, rhs)` pair or
/// a rule written as text like `"Sum -> Sum '+' Num"`.
pub trait IntoRule<V> {
    fn into_rule(self, grammar: &Grammar<V>) -> Result<Rule<V>>;
}

impl<V> IntoRule<V> for Rule<V> {
    fn into_rule(self, _: &Grammar<V>) -> Result<Rule<V>> {
        Ok(self)
    }
}

impl<V> IntoRule<V> for (Symbol, Vec<Element>) {
    fn into_rule(self, _: &Grammar<V>) -> Result<Rule<V>> {
        Ok(Rule::new(self.0, self.1))
    }
}

impl<V> IntoRule<V> for (&Symbol, Vec<Element>) {
    fn into_rule(self, _: &Grammar<V>) -> Result<Rule<V>> {
        Ok(Rule::new(self.0.clone(), self.1))
    }
}

impl<V> IntoRule<V> for &str {
    fn into_rule(self, grammar: &Grammar<V>) -> Result<Rule<V>> {
        grammar.syntax().parse_rule(self, grammar)
    }
}

impl<V> IntoRule<V> for &String {
    fn into_rule(self, grammar: &Grammar<V>) -> Result<Rule<V>> {
        grammar.syntax().parse_rule(self, grammar)
    }
}

///////////////////////////////////////////////////////////////////////////////

/// An ordered collection of rules. The head of the first rule is the start
/// symbol. Rule order also decides which derivation wins when the input is
/// ambiguous: earlier rules are preferred.
pub struct Grammar<V = ()> {
    rules: Vec<Arc<Rule<V>>>,
    syntax: RuleSyntax,
}

impl<V> Default for Grammar<V> {
    fn default() -> Self {
        Grammar { rules: Vec::new(), syntax: RuleSyntax::default() }
    }
}

impl<V> Grammar<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty grammar whose text rules follow a custom lexical convention.
    pub fn with_syntax(syntax: RuleSyntax) -> Self {
        Grammar { rules: Vec::new(), syntax }
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule<V>>) -> Self {
        rules.into_iter().collect()
    }

    pub fn syntax(&self) -> &RuleSyntax {
        &self.syntax
    }

    /// Append a rule, returns the rule as stored in the grammar.
    pub fn rule(&mut self, rule: impl IntoRule<V>) -> Result<Arc<Rule<V>>> {
        let rule = Arc::new(rule.into_rule(self)?);
        trace!("rule #{}: {}", self.rules.len(), rule);
        self.rules.push(rule.clone());
        Ok(rule)
    }

    /// Append a rule with a semantic action attached.
    pub fn rule_with<F>(&mut self, rule: impl IntoRule<V>, valuator: F) -> Result<Arc<Rule<V>>>
    where
        F: Fn(Vec<Value<V>>) -> Result<V, ValuatorError> + Send + Sync + 'static,
    {
        let rule = rule.into_rule(self)?.with_valuator(valuator);
        self.rule(rule)
    }

    pub fn rules(&self) -> &[Arc<Rule<V>>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn start(&self) -> Option<&Symbol> {
        self.rules.first().map(|rule| rule.lhs())
    }

    // Every symbol reference in registration order, heads before bodies
    fn symbol_refs(&self) -> impl Iterator<Item = &Symbol> {
        self.rules.iter().flat_map(|rule| {
            iter::once(rule.lhs()).chain(rule.rhs().iter().filter_map(Element::symbol))
        })
    }

    /// First symbol with this name, in rule registration order.
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbol_refs().find(|symbol| symbol.name() == Some(name))
    }

    /// All named symbols of the grammar by name. Fails if two different
    /// symbols share a name since by-name lookup would be ambiguous.
    pub fn symbols(&self) -> Result<BTreeMap<String, Symbol>> {
        let mut symbols = BTreeMap::new();
        for symbol in self.symbol_refs() {
            let Some(name) = symbol.name() else { continue };
            match symbols.entry(name.to_string()) {
                Entry::Vacant(e) => {
                    e.insert(symbol.clone());
                }
                Entry::Occupied(e) if e.get() != symbol => {
                    return Err(Error::DuplicateSymbolName(name.to_string()));
                }
                Entry::Occupied(_) => (),
            }
        }
        Ok(symbols)
    }

    /// Literal terminals used anywhere in the grammar, without repeats.
    pub fn literals(&self) -> Vec<&str> {
        let mut literals: Vec<&str> = Vec::new();
        for element in self.rules.iter().flat_map(|rule| rule.rhs()) {
            if let Element::Literal(literal) = element {
                if !literals.contains(&literal.as_str()) {
                    literals.push(literal);
                }
            }
        }
        literals
    }
}

impl<V> iter::FromIterator<Rule<V>> for Grammar<V> {
    fn from_iter<I: IntoIterator<Item = Rule<V>>>(rules: I) -> Self {
        Grammar {
            rules: rules.into_iter().map(Arc::new).collect(),
            syntax: RuleSyntax::default(),
        }
    }
}

impl<V> fmt::Display for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut groups: Vec<(&Symbol, Vec<&Rule<V>>)> = Vec::new();
        for rule in &self.rules {
            match groups.iter_mut().find(|(lhs, _)| *lhs == rule.lhs()) {
                Some((_, rules)) => rules.push(rule),
                None => groups.push((rule.lhs(), vec![rule])),
            }
        }
        match self.start() {
            Some(start) => writeln!(f, "Start: {}", start)?,
            None => writeln!(f, "Start: <none>")?,
        }
        for (_, rules) in groups {
            writeln!(f)?;
            for rule in rules {
                writeln!(f, "{}", rule)?;
            }
        }
        Ok(())
    }
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

///////////////////////////////////////////////////////////////////////////////
