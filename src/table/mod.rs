use indexmap::IndexMap;
use prettytable::Table as PtTable;
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, StateId};
use crate::grammar::{Grammar, END};
use crate::sets::{FollowSets, SetSymbol};
use crate::{Error, Result};

mod action;

pub use action::{Action, ReduceEntry};

/// The synthesized ACTION/GOTO tables plus the reduce dictionary.
///
/// Built once from an automaton and the FOLLOW sets, then read-only;
/// the type is serializable so callers can persist it and skip the
/// rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingTable {
    /// ACTION row per state: terminal -> shift/reduce/accept.
    actions: Vec<IndexMap<String, Action>>,
    /// GOTO row per state: nonterminal -> successor state.
    gotos: Vec<IndexMap<String, StateId>>,
    /// "R1", "R2", … in allocation order.
    reduces: IndexMap<String, ReduceEntry>,
    /// Column orders for rendering.
    terminals: Vec<String>,
    nonterminals: Vec<String>,
}

impl ParsingTable {
    /// Merges automaton transitions and FOLLOW sets into the tables.
    ///
    /// Pass 1 projects every transition: terminals become shifts,
    /// nonterminals become gotos. Pass 2 carves out the accept state
    /// (the accepting state holding `S' -> S .`), then numbers the
    /// remaining accepting states' complete items as reduce rules and
    /// spreads each over FOLLOW(head). Any cell claimed twice with
    /// different actions fails the build.
    pub fn build(grammar: &Grammar, automaton: &Automaton, follow: &FollowSets) -> Result<Self> {
        let mut table = Self {
            actions: vec![IndexMap::new(); automaton.len()],
            gotos: vec![IndexMap::new(); automaton.len()],
            reduces: IndexMap::new(),
            terminals: grammar
                .terminals()
                .map(str::to_string)
                .chain([END.to_string()])
                .collect(),
            nonterminals: grammar.nonterminals().map(str::to_string).collect(),
        };

        for (from, symbol, to) in automaton.transitions() {
            if grammar.is_terminal(symbol) {
                table.insert_action(from, symbol, Action::Shift(to))?;
            } else {
                table.gotos[from].insert(symbol.to_string(), to);
            }
        }

        let accept_item = crate::item::Item::new(vec![grammar.start().to_string()], 1);
        let accept_state = automaton
            .accepting()
            .iter()
            .copied()
            .find(|&id| {
                automaton
                    .state(id)
                    .is_some_and(|state| state.contains(&accept_item))
            })
            .ok_or_else(|| {
                Error::Grammar("no state accepts the augmented start production".into())
            })?;
        table.insert_action(accept_state, END, Action::Accept)?;

        let mut counter = 0;
        for &id in automaton.accepting() {
            if id == accept_state {
                continue;
            }
            let Some(state) = automaton.state(id) else {
                continue;
            };
            for item in state.items().filter(|item| item.is_complete()) {
                counter += 1;
                let name = format!("R{counter}");
                let head = grammar.head_of_body(item.symbols()).ok_or_else(|| {
                    Error::Grammar(format!(
                        "no production matches the reduced body {:?} in state {id}",
                        item.symbols().join(" ")
                    ))
                })?;
                table.reduces.insert(
                    name,
                    ReduceEntry {
                        state: id,
                        head: head.to_string(),
                        body: item.symbols().to_vec(),
                    },
                );
            }
        }

        let entries: Vec<(String, ReduceEntry)> = table
            .reduces
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();
        for (name, entry) in entries {
            for member in follow.get(&entry.head).into_iter().flatten() {
                let symbol = match member {
                    SetSymbol::Terminal(terminal) => terminal.as_str(),
                    SetSymbol::End => END,
                    _ => continue,
                };
                table.insert_action(entry.state, symbol, Action::Reduce(name.clone()))?;
            }
        }

        Ok(table)
    }

    fn insert_action(&mut self, state: StateId, symbol: &str, incoming: Action) -> Result<()> {
        match self.actions[state].get(symbol) {
            Some(existing) if *existing != incoming => Err(Error::Conflict {
                state,
                symbol: symbol.to_string(),
                existing: existing.clone(),
                incoming,
            }),
            Some(_) => Ok(()),
            None => {
                self.actions[state].insert(symbol.to_string(), incoming);
                Ok(())
            }
        }
    }

    pub fn action(&self, state: StateId, terminal: &str) -> Option<&Action> {
        self.actions.get(state)?.get(terminal)
    }

    pub fn goto(&self, state: StateId, nonterminal: &str) -> Option<StateId> {
        self.gotos.get(state)?.get(nonterminal).copied()
    }

    pub fn reduce_entry(&self, rule: &str) -> Option<&ReduceEntry> {
        self.reduces.get(rule)
    }

    pub fn reduces(&self) -> impl Iterator<Item = (&str, &ReduceEntry)> {
        self.reduces.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// The terminals with a defined action in this state, in table order.
    pub fn expected_symbols(&self, state: StateId) -> Vec<String> {
        self.actions
            .get(state)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The number of states (rows) in the table.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        table.add_row(
            ["#".to_string()]
                .into_iter()
                .chain(self.terminals.iter().cloned())
                .chain(self.nonterminals.iter().cloned())
                .collect(),
        );

        for state in 0..self.len() {
            table.add_row(
                [state.to_string()]
                    .into_iter()
                    .chain(self.terminals.iter().map(|terminal| {
                        self.actions[state]
                            .get(terminal)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .chain(self.nonterminals.iter().map(|nonterminal| {
                        self.gotos[state]
                            .get(nonterminal)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{table}")?;

        for (name, entry) in &self.reduces {
            writeln!(f)?;
            write!(f, "{name}: {entry}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::augment::augment;
    use crate::automaton::AutomatonBuilder;
    use crate::fixtures::{sentence_grammar, sentence_table};
    use crate::grammar::Grammar;
    use crate::sets::{first_sets, follow_sets};

    #[test]
    fn every_transition_lands_in_a_table() {
        let grammar = sentence_grammar();
        let augmented = augment(&grammar);
        let automaton = AutomatonBuilder::new(&augmented).build().unwrap();
        let follow = follow_sets(&grammar, &first_sets(&grammar));
        let table = ParsingTable::build(&grammar, &automaton, &follow).unwrap();

        for (from, symbol, to) in automaton.transitions() {
            if grammar.is_terminal(symbol) {
                assert_eq!(table.action(from, symbol), Some(&Action::Shift(to)));
            } else {
                assert_eq!(table.goto(from, symbol), Some(to));
            }
        }
    }

    #[test]
    fn accept_cell_sits_on_the_end_marker() {
        let table = sentence_table();
        let accepts = (0..table.len())
            .filter(|&state| table.action(state, END) == Some(&Action::Accept))
            .count();
        assert_eq!(accepts, 1);
    }

    #[test]
    fn reduce_rules_are_numbered_sequentially() {
        let table = sentence_table();
        let names: Vec<&str> = table.reduces().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["R1", "R2", "R3", "R4", "R5", "R6"]);

        for (_, entry) in table.reduces() {
            assert!(!entry.body.is_empty());
            assert!(sentence_grammar().is_nonterminal(&entry.head));
        }
    }

    #[test]
    fn shift_reduce_conflicts_fail_fast() {
        // E -> E + E | n is ambiguous: the state holding E -> E + E .
        // also shifts on "+", and FOLLOW(E) contains "+".
        let grammar = Grammar::builder()
            .nonterminal("E")
            .terminal("+")
            .terminal("n")
            .production("E", "E + E")
            .production("E", "n")
            .build()
            .unwrap();
        let augmented = augment(&grammar);
        let automaton = AutomatonBuilder::new(&augmented).build().unwrap();
        let follow = follow_sets(&grammar, &first_sets(&grammar));

        let result = ParsingTable::build(&grammar, &automaton, &follow);
        match result {
            Err(Error::Conflict {
                symbol,
                existing,
                incoming,
                ..
            }) => {
                assert_eq!(symbol, "+");
                assert!(matches!(existing, Action::Shift(_)));
                assert!(matches!(incoming, Action::Reduce(_)));
            }
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[test]
    fn serializes_and_reloads() {
        let table = sentence_table();
        let json = serde_json::to_string(&table).unwrap();
        let reloaded: ParsingTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, reloaded);
    }
}
