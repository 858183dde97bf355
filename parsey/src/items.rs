#![deny(warnings)]

use std::collections::HashSet;
use std::ops::Index;
use std::slice;

/// An Item is a partially matched rule. `position` shows the match progress.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct Item {
    pub rule: usize,     // index of the rule in its grammar
    pub position: usize, // how many body elements have been matched
    pub origin: usize,   // chart state where the match started
}

impl Item {
    /// Build a new `Prediction` based Item.
    pub fn predict(rule: usize, origin: usize) -> Item {
        Item { rule, position: 0, origin }
    }

    /// Same item with one more element matched, used by scans and completions.
    pub fn advance(&self) -> Item {
        Item { position: self.position + 1, ..*self }
    }
}

/// Items valid at one input position. Insertion order is kept so the chart
/// can be walked as a worklist while it grows; duplicates are dropped.
#[derive(Default, Debug, Clone)]
pub struct State {
    order: Vec<Item>,
    dedup: HashSet<Item>,
}

impl State {
    /// Add an item, returns false if it was already present.
    pub fn push(&mut self, item: Item) -> bool {
        if self.dedup.insert(item) {
            self.order.push(item);
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.dedup.contains(item)
    }

    pub fn items(&self) -> &[Item] {
        &self.order
    }

    pub fn iter(&self) -> slice::Iter<'_, Item> {
        self.order.iter()
    }
}

impl Index<usize> for State {
    type Output = Item;
    fn index(&self, idx: usize) -> &Item {
        &self.order[idx]
    }
}

impl Extend<Item> for State {
    fn extend<I: IntoIterator<Item = Item>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }
}

impl FromIterator<Item> for State {
    fn from_iter<I: IntoIterator<Item = Item>>(items: I) -> Self {
        let mut state = State::default();
        state.extend(items);
        state
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = &'a Item;
    type IntoIter = slice::Iter<'a, Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

///////////////////////////////////////////////////////////////////////////////
