use indexmap::{IndexMap, IndexSet};

use crate::grammar::Grammar;
use crate::sets::first::FirstSets;

use super::SetSymbol;

/// FOLLOW(N) per nonterminal: the terminals (and `$`) that can
/// immediately follow N in some derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets(IndexMap<String, IndexSet<SetSymbol>>);

impl FollowSets {
    pub fn get(&self, nonterminal: &str) -> Option<&IndexSet<SetSymbol>> {
        self.0.get(nonterminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<SetSymbol>)> {
        self.0.iter().map(|(name, set)| (name.as_str(), set))
    }
}

/// Computes FOLLOW for every nonterminal, given FIRST.
///
/// A single scan over every production `B -> … A β` records:
/// - β starts with a terminal: that terminal;
/// - β starts with a nonterminal C: FIRST(C) without ε, plus the
///   placeholder FOLLOW(B) when C has an epsilon alternative;
/// - β empty and A ≠ B: the placeholder FOLLOW(B).
///
/// Placeholders are then expanded against the current contents of the
/// referenced sets until nothing changes (self-references drop), and
/// finally stripped.
pub fn follow_sets(grammar: &Grammar, first: &FirstSets) -> FollowSets {
    let mut follow: IndexMap<String, IndexSet<SetSymbol>> = grammar
        .nonterminals()
        .map(|name| (name.to_string(), IndexSet::new()))
        .collect();

    follow[grammar.start()].insert(SetSymbol::End);

    for (head, bodies) in grammar.productions() {
        for body in bodies {
            let Some(symbols) = body.as_symbols() else {
                continue;
            };
            for (position, symbol) in symbols.iter().enumerate() {
                if !grammar.is_nonterminal(symbol) {
                    continue;
                }
                match symbols.get(position + 1) {
                    Some(next) if grammar.is_nonterminal(next) => {
                        let inherited: Vec<SetSymbol> = first
                            .get(next)
                            .into_iter()
                            .flatten()
                            .filter(|member| **member != SetSymbol::Epsilon)
                            .cloned()
                            .collect();
                        follow[symbol.as_str()].extend(inherited);
                        if grammar.has_epsilon_alternative(next) {
                            follow[symbol.as_str()].insert(SetSymbol::Follow(head.to_string()));
                        }
                    }
                    Some(next) => {
                        follow[symbol.as_str()].insert(SetSymbol::terminal(next));
                    }
                    None if symbol != head => {
                        follow[symbol.as_str()].insert(SetSymbol::Follow(head.to_string()));
                    }
                    None => {}
                }
            }
        }
    }

    // Placeholder resolution: a graph fixed point, not an iteration cap.
    // Each pass unions the referenced set's current contents (including
    // its own placeholders, so chains propagate) until no set grows.
    loop {
        let mut changed = false;
        let snapshot = follow.clone();

        for (name, set) in follow.iter_mut() {
            let placeholders: Vec<String> = set
                .iter()
                .filter_map(|member| match member {
                    SetSymbol::Follow(referenced) => Some(referenced.clone()),
                    _ => None,
                })
                .collect();

            for referenced in placeholders {
                let Some(contents) = snapshot.get(referenced.as_str()) else {
                    continue;
                };
                for member in contents {
                    match member {
                        SetSymbol::Epsilon => {}
                        SetSymbol::Follow(target) if target == name => {}
                        other => changed |= set.insert(other.clone()),
                    }
                }
            }
        }

        if !changed {
            break;
        }
    }

    for set in follow.values_mut() {
        set.retain(|member| !member.is_placeholder());
    }

    FollowSets(follow)
}
