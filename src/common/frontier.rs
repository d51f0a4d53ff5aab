use super::node::NodeId;
use super::state::State;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct OpenEntry {
    pub priority: usize,
    pub f: usize,
    pub g: usize,
    pub id: NodeId,
    pub state: Rc<State>,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            // Higher g cost has higher priority
            .then_with(|| other.g.cmp(&self.g))
            // Then insertion order, node ids are handed out sequentially.
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Priority-ordered open list with state lookup.
///
/// Besides the priority order it keeps multisets of the f and g values of
/// its entries, which the bidirectional stopping rules need.
#[derive(Debug, Default)]
pub struct OpenList {
    entries: BTreeSet<OpenEntry>,
    index: HashMap<Rc<State>, OpenEntry>,
    f_values: BTreeMap<usize, usize>,
    g_values: BTreeMap<usize, usize>,
}

impl OpenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, replacing any entry already held for the same state.
    pub fn insert(&mut self, entry: OpenEntry) {
        self.remove(&entry.state);
        increment(&mut self.f_values, entry.f);
        increment(&mut self.g_values, entry.g);
        self.index.insert(Rc::clone(&entry.state), entry.clone());
        self.entries.insert(entry);
    }

    pub fn pop_first(&mut self) -> Option<OpenEntry> {
        let entry = self.entries.pop_first()?;
        self.index.remove(&*entry.state);
        decrement(&mut self.f_values, entry.f);
        decrement(&mut self.g_values, entry.g);
        Some(entry)
    }

    pub fn remove(&mut self, state: &State) -> Option<OpenEntry> {
        let entry = self.index.remove(state)?;
        self.entries.remove(&entry);
        decrement(&mut self.f_values, entry.f);
        decrement(&mut self.g_values, entry.g);
        Some(entry)
    }

    pub fn get(&self, state: &State) -> Option<&OpenEntry> {
        self.index.get(state)
    }

    pub fn contains(&self, state: &State) -> bool {
        self.index.contains_key(state)
    }

    pub fn min_priority(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.priority)
    }

    pub fn min_f(&self) -> Option<usize> {
        self.f_values.keys().next().copied()
    }

    pub fn min_g(&self) -> Option<usize> {
        self.g_values.keys().next().copied()
    }

    /// Entries in ascending priority order.
    pub fn iter(&self) -> impl Iterator<Item = &OpenEntry> {
        self.entries.iter()
    }
}

fn increment(values: &mut BTreeMap<usize, usize>, key: usize) {
    *values.entry(key).or_default() += 1;
}

fn decrement(values: &mut BTreeMap<usize, usize>, key: usize) {
    if let Some(count) = values.get_mut(&key) {
        *count -= 1;
        if *count == 0 {
            values.remove(&key);
        }
    }
}

#[derive(Debug, Default)]
pub struct ClosedList {
    nodes: HashMap<Rc<State>, NodeId>,
}

impl ClosedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, state: Rc<State>, id: NodeId) {
        self.nodes.insert(state, id);
    }

    pub fn get(&self, state: &State) -> Option<NodeId> {
        self.nodes.get(state).copied()
    }

    pub fn contains(&self, state: &State) -> bool {
        self.nodes.contains_key(state)
    }

    pub fn remove(&mut self, state: &State) -> Option<NodeId> {
        self.nodes.remove(state)
    }
}

/// One search direction: its open and closed lists.
#[derive(Debug, Default)]
pub struct Frontier {
    pub open: OpenList,
    pub closed: ClosedList,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node held for `state` in either list.
    pub fn find(&self, state: &State) -> Option<NodeId> {
        self.open
            .get(state)
            .map(|entry| entry.id)
            .or_else(|| self.closed.get(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Operator;

    fn entry(state: &Rc<State>, priority: usize, g: usize, id: NodeId) -> OpenEntry {
        OpenEntry {
            priority,
            f: priority,
            g,
            id,
            state: Rc::clone(state),
        }
    }

    fn states(count: usize) -> Vec<Rc<State>> {
        let mut state = State::goal(3).unwrap();
        let mut states = vec![Rc::new(state.clone())];
        for operator in [Operator::Up, Operator::Left, Operator::Up, Operator::Left]
            .into_iter()
            .take(count - 1)
        {
            state = state.apply(operator).unwrap();
            states.push(Rc::new(state.clone()));
        }
        states
    }

    #[test]
    fn test_pop_order_and_tie_break() {
        let states = states(4);
        let mut open = OpenList::new();
        open.insert(entry(&states[0], 5, 1, 0));
        open.insert(entry(&states[1], 3, 1, 1));
        // Same priority, deeper node first.
        open.insert(entry(&states[2], 3, 2, 2));
        // Same priority and g, earlier node first.
        open.insert(entry(&states[3], 3, 1, 3));

        let order: Vec<NodeId> = std::iter::from_fn(|| open.pop_first())
            .map(|entry| entry.id)
            .collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
        assert!(open.is_empty());
    }

    #[test]
    fn test_replace_and_bounds() {
        let states = states(3);
        let mut open = OpenList::new();
        open.insert(entry(&states[0], 6, 4, 0));
        open.insert(entry(&states[1], 8, 2, 1));
        assert_eq!(open.min_f(), Some(6));
        assert_eq!(open.min_g(), Some(2));

        // A cheaper entry for an already-open state replaces the old one.
        open.insert(entry(&states[0], 4, 2, 2));
        assert_eq!(open.len(), 2);
        assert_eq!(open.get(&states[0]).map(|entry| entry.id), Some(2));
        assert_eq!(open.min_priority(), Some(4));

        assert!(open.remove(&states[0]).is_some());
        assert_eq!(open.min_f(), Some(8));
        assert_eq!(open.min_g(), Some(2));
        assert!(!open.contains(&states[0]));
        assert!(open.remove(&states[2]).is_none());
    }

    #[test]
    fn test_frontier_find() {
        let states = states(2);
        let mut frontier = Frontier::new();
        frontier.open.insert(entry(&states[0], 1, 0, 0));
        frontier.closed.insert(Rc::clone(&states[1]), 1);
        assert_eq!(frontier.find(&states[0]), Some(0));
        assert_eq!(frontier.find(&states[1]), Some(1));
        assert_eq!(frontier.find(&State::goal(4).unwrap()), None);
    }
}
