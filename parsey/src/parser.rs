#![deny(warnings)]

use crate::grammar::{Element, Grammar, Rule, Symbol};
use crate::items::{Item, State};
use log::{debug, log_enabled, trace, Level};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

type Waiting<'g> = HashMap<&'g Symbol, Vec<Item>>;

/// Builds Earley charts for one grammar. The parser holds no per-input
/// state so it can be reused (and shared between threads) freely.
pub struct EarleyParser<'g, V> {
    grammar: &'g Grammar<V>,
    // rule indexes by rule head, in registration order
    productions: HashMap<&'g Symbol, Vec<usize>>,
}

impl<'g, V> EarleyParser<'g, V> {
    pub fn new(grammar: &'g Grammar<V>) -> Self {
        let mut productions: HashMap<&Symbol, Vec<usize>> = HashMap::new();
        for (idx, rule) in grammar.rules().iter().enumerate() {
            productions.entry(rule.lhs()).or_default().push(idx);
        }
        EarleyParser { grammar, productions }
    }

    /// Build new `Prediction` items for `symbol` at position `k`.
    /// If `symbol` already completed empty here the `trigger` is advanced
    /// over it too, that completion has already run.
    fn predictions(&self, trigger: &Item, symbol: &Symbol, nulled: bool, k: usize) -> Vec<Item> {
        let mut items: Vec<Item> = self.productions.get(symbol)
            .into_iter()
            .flatten()
            .map(|&rule| Item::predict(rule, k))
            .collect();
        if nulled {
            items.push(trigger.advance());
        }
        items
    }

    /// Build new `Completion` items for a completed `lhs`.
    /// Advances the items of its origin state waiting on it.
    fn completions(&self, waiting: &Waiting<'g>, lhs: &Symbol) -> Vec<Item> {
        waiting.get(lhs).into_iter().flatten().map(Item::advance).collect()
    }

    /// Run predict/scan/complete over the tokens. Always returns one state
    /// per input position (tokens + 1), failed parses included.
    pub fn chart<T: AsRef<str>>(&self, tokens: &[T]) -> Chart<'g, V> {
        let mut chart = Chart {
            grammar: self.grammar,
            states: (0..=tokens.len()).map(|_| State::default()).collect(),
        };
        if let Some(start) = self.grammar.start() {
            let seeds = self.productions.get(start).into_iter().flatten();
            chart.states[0].extend(seeds.map(|&rule| Item::predict(rule, 0)));
        }
        // items of each state by the symbol they wait on
        let mut waiting: Vec<Waiting<'g>> = (0..=tokens.len()).map(|_| HashMap::new()).collect();

        for k in 0..chart.states.len() {
            // symbols completed over the empty span k..k
            let mut nulled: HashSet<&'g Symbol> = HashSet::new();
            // States grow while walked, predictions/completions reach a fixed point
            let mut cursor = 0;
            while cursor < chart.states[k].len() {
                let item = chart.states[k][cursor];
                cursor += 1;
                match chart.next_element(&item) {
                    None => {
                        let lhs = chart.rule(&item).lhs();
                        if item.origin == k {
                            nulled.insert(lhs);
                        }
                        let advanced = self.completions(&waiting[item.origin], lhs);
                        chart.states[k].extend(advanced);
                    }
                    Some(Element::Symbol(symbol)) => {
                        waiting[k].entry(symbol).or_default().push(item);
                        let predicted = self.predictions(&item, symbol, nulled.contains(symbol), k);
                        chart.states[k].extend(predicted);
                    }
                    Some(terminal) => {
                        let scanned = tokens.get(k).is_some_and(|t| terminal.matches(t.as_ref()));
                        if scanned {
                            chart.states[k + 1].push(item.advance());
                        }
                    }
                }
            }
            if k < tokens.len() && chart.states[k + 1].is_empty() {
                debug!("nothing scans token {} {:?}", k, tokens[k].as_ref());
            }
        }

        debug!(
            "chart: {} states, {} items, accepted: {}",
            chart.states.len(),
            chart.states.iter().map(State::len).sum::<usize>(),
            chart.accepted()
        );
        if log_enabled!(Level::Trace) {
            trace!("{}", chart);
        }
        chart
    }
}

/// Build the chart for `tokens`.
pub fn earley<'g, V, T: AsRef<str>>(tokens: &[T], grammar: &'g Grammar<V>) -> Chart<'g, V> {
    EarleyParser::new(grammar).chart(tokens)
}

///////////////////////////////////////////////////////////////////////////////

/// The result of recognition: one `State` per input position.
pub struct Chart<'g, V> {
    grammar: &'g Grammar<V>,
    states: Vec<State>,
}

impl<'g, V> Chart<'g, V> {
    pub fn grammar(&self) -> &'g Grammar<V> {
        self.grammar
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn rule(&self, item: &Item) -> &'g Arc<Rule<V>> {
        &self.grammar.rules()[item.rule]
    }

    pub fn is_complete(&self, item: &Item) -> bool {
        item.position >= self.rule(item).rhs().len()
    }

    pub fn next_element(&self, item: &Item) -> Option<&'g Element> {
        self.rule(item).rhs().get(item.position)
    }

    /// Complete items for `symbol` in state `state`, ordered by rule
    /// registration and then by origin.
    pub fn completions(&self, state: usize, symbol: &Symbol) -> Vec<Item> {
        let Some(state) = self.states.get(state) else {
            return Vec::new();
        };
        let mut items: Vec<Item> = state.iter()
            .filter(|item| self.is_complete(item) && self.rule(item).lhs() == symbol)
            .copied()
            .collect();
        items.sort_by_key(|item| (item.rule, item.origin));
        items
    }

    /// Complete start symbol items spanning the whole input.
    pub fn roots(&self) -> Vec<Item> {
        let (Some(start), Some(last)) = (self.grammar.start(), self.states.len().checked_sub(1))
        else {
            return Vec::new();
        };
        let mut roots = self.completions(last, start);
        roots.retain(|item| item.origin == 0);
        roots
    }

    /// Check if any derivation of the start symbol spans the whole input.
    pub fn accepted(&self) -> bool {
        !self.roots().is_empty()
    }

    /// Render an item as a dotted rule, eg: `(0) Sum -> Sum · "+" Num`.
    pub fn dotted(&self, item: &Item) -> String {
        let rule = self.rule(item);
        let mut out = format!("({}) {} ->", item.origin, rule.lhs());
        for (idx, element) in rule.rhs().iter().enumerate() {
            if idx == item.position {
                out.push_str(" \u{00b7}");
            }
            out.push_str(&format!(" {}", element));
        }
        if self.is_complete(item) {
            out.push_str(" \u{00b7}");
        }
        out
    }
}

impl<V> fmt::Display for Chart<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, state) in self.states.iter().enumerate() {
            writeln!(f, "=== State {} ===", idx)?;
            for item in state {
                writeln!(f, "{}", self.dotted(item))?;
            }
        }
        Ok(())
    }
}

impl<V> fmt::Debug for Chart<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

///////////////////////////////////////////////////////////////////////////////
