#![deny(warnings)]

use crate::error::{Error, Result};
use crate::grammar::{Element, Rule, Symbol};
use crate::items::Item;
use crate::parser::Chart;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A parse result. Tokens are leaves, rules without a valuator give nodes
/// and rules with one give whatever the valuator computed.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<V = ()> {
    Token(String),
    Node(Node<V>),
    Eval(V),
}

/// A derivation of a rule over the tokens `item.origin..end`.
pub struct Node<V = ()> {
    pub item: Item,
    pub end: usize,
    pub rule: Arc<Rule<V>>,
    pub children: Vec<Value<V>>,
}

impl<V> Node<V> {
    pub fn lhs(&self) -> &Symbol {
        self.rule.lhs()
    }

    /// Token positions covered by this node.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.item.origin..self.end
    }
}

impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        Node {
            item: self.item,
            end: self.end,
            rule: self.rule.clone(),
            children: self.children.clone(),
        }
    }
}

impl<V: PartialEq> PartialEq for Node<V> {
    fn eq(&self, other: &Node<V>) -> bool {
        self.item == other.item
            && self.end == other.end
            && Arc::ptr_eq(&self.rule, &other.rule)
            && self.children == other.children
    }
}

impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("rule", &self.rule.to_string())
            .field("span", &self.span())
            .field("children", &self.children)
            .finish()
    }
}

impl<V> Value<V> {
    pub fn token(&self) -> Option<&str> {
        match self {
            Value::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn node(&self) -> Option<&Node<V>> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn evaluated(&self) -> Option<&V> {
        match self {
            Value::Eval(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_evaluated(self) -> Option<V> {
        match self {
            Value::Eval(value) => Some(value),
            _ => None,
        }
    }

    /// Tokens under this value, left to right. Evaluated subtrees have none.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(value) = pending.pop() {
            match value {
                Value::Token(token) => leaves.push(token.as_str()),
                Value::Node(node) => pending.extend(node.children.iter().rev()),
                Value::Eval(_) => (),
            }
        }
        leaves
    }
}

impl<V> Drop for Node<V> {
    // Flatten nested children so deep trees don't overflow on drop
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(value) = pending.pop() {
            if let Value::Node(mut node) = value {
                pending.append(&mut node.children);
            }
        }
    }
}

// S-expression like rendering, eg: (Sum (Num 1) + (Num 2))
impl<V: fmt::Debug> fmt::Display for Value<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // None closes the innermost open node
        let mut pending: Vec<Option<(&Value<V>, &str)>> = vec![Some((self, ""))];
        while let Some(piece) = pending.pop() {
            let Some((value, sep)) = piece else {
                write!(f, ")")?;
                continue;
            };
            match value {
                Value::Token(token) => write!(f, "{}{}", sep, token)?,
                Value::Eval(value) => write!(f, "{}{:?}", sep, value)?,
                Value::Node(node) => {
                    write!(f, "{}({}", sep, node.lhs())?;
                    pending.push(None);
                    pending.extend(node.children.iter().rev().map(|child| Some((child, " "))));
                }
            }
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////

// A derivation found in the chart, before any valuator runs
struct Derivation {
    item: Item,
    end: usize,
    children: Vec<Shape>,
}

enum Shape {
    Token(usize),
    // index into TreeBuilder::derivations
    Node(usize),
}

// An element matched while unwinding: the boundary it ends at and the
// complete items left to try for it. Tokens have no alternatives.
struct Choice {
    at: usize,
    candidates: Rc<[Item]>,
    next: usize,
}

// A derivation being unwound. The body is matched right to left, `children`
// and `choices` grow together, a choice with no child yet is pending.
struct Frame {
    item: Item,
    end: usize,
    at: usize,
    children: Vec<Shape>,
    choices: Vec<Choice>,
}

impl Frame {
    fn new(item: Item, end: usize) -> Self {
        Frame { item, end, at: end, children: Vec::new(), choices: Vec::new() }
    }
}

enum Step {
    Descend(Item, usize),
    Found,
    Failed,
}

enum Visit {
    Enter(usize),
    Token(usize),
    Exit(usize),
}

struct TreeBuilder<'c, 'g, V, T> {
    chart: &'c Chart<'g, V>,
    tokens: &'c [T],
    // complete items by (state, symbol), in candidate order
    candidates: HashMap<(usize, &'g Symbol), Rc<[Item]>>,
    // derivations being unwound, breaks cycles through empty rules
    active: HashSet<(Item, usize)>,
    derivations: Vec<Derivation>,
}

impl<'c, 'g, V, T: AsRef<str>> TreeBuilder<'c, 'g, V, T> {
    fn candidates(&mut self, state: usize, symbol: &'g Symbol) -> Rc<[Item]> {
        let chart = self.chart;
        self.candidates
            .entry((state, symbol))
            .or_insert_with(|| chart.completions(state, symbol).into())
            .clone()
    }

    // Unwind `root` over ..end with an explicit frame stack, one frame per
    // nested derivation. Returns the index of the finished derivation.
    fn build(&mut self, root: Item, end: usize) -> Option<usize> {
        if !self.active.insert((root, end)) {
            return None;
        }
        let mut stack = vec![Frame::new(root, end)];
        while let Some(frame) = stack.last_mut() {
            match self.step(frame) {
                Step::Descend(item, at) => {
                    // items already on the path are skipped, the parent moves on
                    if self.active.insert((item, at)) {
                        stack.push(Frame::new(item, at));
                    }
                }
                Step::Found => {
                    let Some(mut done) = stack.pop() else { break };
                    self.active.remove(&(done.item, done.end));
                    done.children.reverse();
                    let origin = done.item.origin;
                    let idx = self.derivations.len();
                    self.derivations.push(Derivation {
                        item: done.item,
                        end: done.end,
                        children: done.children,
                    });
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.children.push(Shape::Node(idx));
                            parent.at = origin;
                        }
                        None => return Some(idx),
                    }
                }
                Step::Failed => {
                    let Some(done) = stack.pop() else { break };
                    self.active.remove(&(done.item, done.end));
                }
            }
        }
        None
    }

    // Advance `frame` until it needs a sub-derivation, matches its whole
    // body or runs out of alternatives.
    fn step(&mut self, frame: &mut Frame) -> Step {
        let chart = self.chart;
        let Item { rule, position, origin } = frame.item;
        loop {
            let remaining = position - frame.children.len();
            if frame.choices.len() > frame.children.len() {
                let prefix = Item { rule, position: remaining - 1, origin };
                if let Some(choice) = frame.choices.last_mut() {
                    while let Some(&candidate) = choice.candidates.get(choice.next) {
                        choice.next += 1;
                        let mid = candidate.origin;
                        if mid >= origin && chart.states()[mid].contains(&prefix) {
                            return Step::Descend(candidate, choice.at);
                        }
                    }
                }
                frame.choices.pop();
            } else if remaining == 0 {
                if frame.at == origin {
                    return Step::Found;
                }
            } else {
                let at = frame.at;
                let prefix = Item { rule, position: remaining - 1, origin };
                match &chart.grammar().rules()[rule].rhs()[remaining - 1] {
                    Element::Symbol(symbol) => {
                        let candidates = self.candidates(at, symbol);
                        frame.choices.push(Choice { at, candidates, next: 0 });
                        continue;
                    }
                    terminal => {
                        if at > origin
                            && terminal.matches(self.tokens[at - 1].as_ref())
                            && chart.states()[at - 1].contains(&prefix)
                        {
                            frame.choices.push(Choice { at, candidates: Rc::from([]), next: 0 });
                            frame.children.push(Shape::Token(at - 1));
                            frame.at = at - 1;
                            continue;
                        }
                    }
                }
            }
            // dead end, undo the last matched element and retry it
            if frame.children.pop().is_none() {
                return Step::Failed;
            }
            if let Some(choice) = frame.choices.last() {
                frame.at = choice.at;
            }
        }
    }

    // Apply valuators bottom-up (post-order), a failing valuator aborts the
    // whole parse
    fn evaluate(&self, root: usize) -> Result<Value<V>> {
        let mut todo = vec![Visit::Enter(root)];
        let mut done: Vec<Value<V>> = Vec::new();
        while let Some(visit) = todo.pop() {
            match visit {
                Visit::Token(idx) => {
                    done.push(Value::Token(self.tokens[idx].as_ref().to_string()));
                }
                Visit::Enter(idx) => {
                    todo.push(Visit::Exit(idx));
                    let children = self.derivations[idx].children.iter().rev();
                    todo.extend(children.map(|shape| match *shape {
                        Shape::Token(token) => Visit::Token(token),
                        Shape::Node(child) => Visit::Enter(child),
                    }));
                }
                Visit::Exit(idx) => {
                    let derivation = &self.derivations[idx];
                    let split = done.len().saturating_sub(derivation.children.len());
                    let children = done.split_off(split);
                    let rule = self.chart.rule(&derivation.item).clone();
                    let value = match rule.valuator().cloned() {
                        Some(valuator) => {
                            trace!("valuator: {}", rule);
                            Value::Eval((*valuator)(children).map_err(Error::Valuator)?)
                        }
                        None => Value::Node(Node {
                            item: derivation.item,
                            end: derivation.end,
                            rule,
                            children,
                        }),
                    };
                    done.push(value);
                }
            }
        }
        done.pop().ok_or_else(|| Error::NoParse("empty derivation".to_string()))
    }
}

/// Rebuild one derivation of the whole input from `chart` and evaluate it.
///
/// When the input is ambiguous the first consistent derivation is taken,
/// preferring rules registered earlier and then shorter left neighbours.
/// `tokens` must be the sequence the chart was built from.
pub fn dfs<V, T: AsRef<str>>(chart: &Chart<V>, tokens: &[T]) -> Result<Value<V>> {
    if chart.states().len() != tokens.len() + 1 {
        return Err(Error::NoParse(format!(
            "chart has {} states for {} tokens",
            chart.states().len(),
            tokens.len()
        )));
    }
    let roots = chart.roots();
    if roots.is_empty() {
        let reason = match chart.grammar().start() {
            None => "grammar has no rules".to_string(),
            Some(start) => format!("no derivation of {} spans all {} tokens", start, tokens.len()),
        };
        return Err(Error::NoParse(reason));
    }
    let mut builder = TreeBuilder {
        chart,
        tokens,
        candidates: HashMap::new(),
        active: HashSet::new(),
        derivations: Vec::new(),
    };
    for root in roots {
        if let Some(idx) = builder.build(root, tokens.len()) {
            debug!("derivation rooted at {}", chart.rule(&root));
            return builder.evaluate(idx);
        }
    }
    Err(Error::NoParse("no consistent derivation in chart".to_string()))
}

///////////////////////////////////////////////////////////////////////////////
