use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::augment::AugmentedGrammar;
use crate::item::Item;
use crate::{Error, Result};

pub type StateId = usize;

const DEFAULT_STATE_LIMIT: usize = 10_000;

/// How state 0 is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seeding {
    /// Every production of the augmented grammar, dot 0. This reproduces
    /// the construction the parse tables were historically generated with.
    #[default]
    AllProductions,
    /// Canonical LR(0): the closure of the augmented start production.
    StartClosure,
}

/// One item set of the canonical collection, with a dense id.
#[derive(Debug, Clone)]
pub struct State {
    id: StateId,
    items: IndexSet<Item>,
}

impl State {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// A state accepts when at least one item has its dot at the end.
    pub fn is_accepting(&self) -> bool {
        self.items.iter().any(Item::is_complete)
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }
}

impl PartialEq for State {
    /// Two states are the same state iff their item sets are equal as
    /// sets; insertion order is irrelevant (IndexSet equality).
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "state {}:", self.id)?;
        for item in &self.items {
            writeln!(f, "  {item}")?;
        }
        Ok(())
    }
}

/// The deterministic automaton over item sets, exposed read-only once
/// built.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    transitions: Vec<(StateId, String, StateId)>,
    initial: StateId,
    accepting: Vec<StateId>,
}

impl Automaton {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Accepting state ids, in discovery order.
    pub fn accepting(&self) -> &[StateId] {
        &self.accepting
    }

    pub fn transitions(&self) -> impl Iterator<Item = (StateId, &str, StateId)> {
        self.transitions
            .iter()
            .map(|(from, symbol, to)| (*from, symbol.as_str(), *to))
    }

    pub fn target(&self, from: StateId, symbol: &str) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|(f, s, _)| *f == from && s == symbol)
            .map(|(_, _, to)| *to)
    }
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for state in &self.states {
            state.fmt(f)?;
        }
        for (from, symbol, to) in &self.transitions {
            writeln!(f, "δ({from}, {symbol}) = {to}")?;
        }
        Ok(())
    }
}

/// Builds the canonical collection of item sets over an arena of states
/// walked by a cursor: newly created states are appended behind the
/// cursor and processed before the loop exits.
pub struct AutomatonBuilder<'g> {
    grammar: &'g AugmentedGrammar,
    seeding: Seeding,
    state_limit: usize,
}

impl<'g> AutomatonBuilder<'g> {
    pub fn new(grammar: &'g AugmentedGrammar) -> Self {
        Self {
            grammar,
            seeding: Seeding::default(),
            state_limit: DEFAULT_STATE_LIMIT,
        }
    }

    pub fn seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Bounds construction work against pathological grammars.
    pub fn state_limit(mut self, limit: usize) -> Self {
        self.state_limit = limit;
        self
    }

    /// The closure of a nonterminal: breadth-first over leading
    /// nonterminals, each visited at most once, collecting every visited
    /// nonterminal's dot-0 items.
    pub fn closure(&self, symbol: &str) -> Vec<Item> {
        let mut result = Vec::new();
        let mut visited: IndexSet<String> = IndexSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        visited.insert(symbol.to_string());
        queue.push_back(symbol.to_string());

        while let Some(current) = queue.pop_front() {
            for item in self.grammar.items_of(&current) {
                result.push(item.clone());

                if let Some(first) = item.symbols().first() {
                    if self.grammar.has_productions(first) && !visited.contains(first.as_str()) {
                        visited.insert(first.clone());
                        queue.push_back(first.clone());
                    }
                }
            }
        }

        result
    }

    fn seed(&self) -> IndexSet<Item> {
        match self.seeding {
            Seeding::AllProductions => self.grammar.iter_items().cloned().collect(),
            Seeding::StartClosure => self.closure(self.grammar.start()).into_iter().collect(),
        }
    }

    pub fn build(self) -> Result<Automaton> {
        let mut states = vec![State {
            id: 0,
            items: self.seed(),
        }];
        let mut transitions: Vec<(StateId, String, StateId)> = Vec::new();
        let mut accepting: Vec<StateId> = Vec::new();

        let mut cursor = 0;
        while cursor < states.len() {
            let current: Vec<Item> = states[cursor].items.iter().cloned().collect();

            // Group in-progress items by the symbol after the dot; each
            // group advances by one and becomes a kernel. Complete items
            // mark the state as accepting.
            let mut kernels: IndexMap<String, IndexSet<Item>> = IndexMap::new();
            let mut complete = false;
            for item in &current {
                match item.next_symbol() {
                    Some(symbol) => {
                        kernels
                            .entry(symbol.to_string())
                            .or_default()
                            .insert(item.advanced());
                    }
                    None => complete = true,
                }
            }
            if complete {
                accepting.push(cursor);
            }

            for (symbol, mut items) in kernels {
                // Merge the closure of every distinct nonterminal that
                // appears after a kernel dot, not just the last one seen.
                let expand: IndexSet<String> = items
                    .iter()
                    .filter_map(Item::next_symbol)
                    .filter(|next| self.grammar.is_nonterminal(next))
                    .map(str::to_string)
                    .collect();
                for nonterminal in &expand {
                    items.extend(self.closure(nonterminal));
                }

                // Set-equality dedup against every existing state.
                let target = match states.iter().find(|state| state.items == items) {
                    Some(state) => state.id,
                    None => {
                        let id = states.len();
                        if id >= self.state_limit {
                            return Err(Error::StateLimit(self.state_limit));
                        }
                        states.push(State { id, items });
                        id
                    }
                };

                transitions.push((cursor, symbol, target));
            }

            cursor += 1;
        }

        Ok(Automaton {
            states,
            transitions,
            initial: 0,
            accepting,
        })
    }
}
