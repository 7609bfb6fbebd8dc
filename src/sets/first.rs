use indexmap::{IndexMap, IndexSet};

use crate::grammar::{Body, Grammar};

use super::SetSymbol;

/// FIRST(N) per nonterminal: the terminals (and ε) that can begin a
/// string derived from N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets(IndexMap<String, IndexSet<SetSymbol>>);

impl FirstSets {
    pub fn get(&self, nonterminal: &str) -> Option<&IndexSet<SetSymbol>> {
        self.0.get(nonterminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<SetSymbol>)> {
        self.0.iter().map(|(name, set)| (name.as_str(), set))
    }
}

/// Computes FIRST for every nonterminal.
///
/// The scan adds leading terminals and ε markers directly; a leading
/// nonterminal M ≠ N is recorded as the dependency FIRST(N) ⊇ FIRST(M).
/// Dependencies are then propagated until no set changes.
pub fn first_sets(grammar: &Grammar) -> FirstSets {
    let mut first: IndexMap<String, IndexSet<SetSymbol>> = grammar
        .nonterminals()
        .map(|name| (name.to_string(), IndexSet::new()))
        .collect();
    let mut dependencies: Vec<(String, String)> = Vec::new();

    for nonterminal in grammar.nonterminals() {
        for body in grammar.bodies(nonterminal) {
            match body {
                Body::Epsilon => {
                    first[nonterminal].insert(SetSymbol::Epsilon);
                }
                Body::Symbols(symbols) => {
                    let leading = &symbols[0];
                    if grammar.is_nonterminal(leading) {
                        if leading != nonterminal {
                            // FIRST(nonterminal) ⊇ FIRST(leading)
                            dependencies.push((leading.clone(), nonterminal.to_string()));
                        }
                    } else {
                        first[nonterminal].insert(SetSymbol::terminal(leading));
                    }
                }
            }
        }
    }

    loop {
        let mut changed = false;
        for (source, target) in &dependencies {
            let members: Vec<SetSymbol> = first[source.as_str()].iter().cloned().collect();
            let set = &mut first[target.as_str()];
            for member in members {
                changed |= set.insert(member);
            }
        }
        if !changed {
            break;
        }
    }

    FirstSets(first)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixtures::sentence_grammar;
    use crate::grammar::Grammar;

    fn terminals(sets: &FirstSets, nonterminal: &str) -> Vec<String> {
        sets.get(nonterminal)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn sentence_grammar_firsts() {
        let sets = first_sets(&sentence_grammar());
        assert_eq!(terminals(&sets, "Q"), vec!["[", "sentence"]);
        // S and P inherit FIRST(Q) through the dependency chain.
        assert_eq!(terminals(&sets, "P"), vec!["[", "sentence"]);
        assert_eq!(terminals(&sets, "S"), vec!["[", "sentence"]);
    }

    #[test]
    fn deep_chains_resolve_to_a_fixed_point() {
        // A -> B, B -> C, C -> D, D -> d: a single propagation pass in
        // the wrong order would leave FIRST(A) empty.
        let grammar = Grammar::builder()
            .nonterminal("A")
            .nonterminal("B")
            .nonterminal("C")
            .nonterminal("D")
            .terminal("d")
            .production("A", "B")
            .production("B", "C")
            .production("C", "D")
            .production("D", "d")
            .build()
            .unwrap();
        let sets = first_sets(&grammar);
        assert_eq!(terminals(&sets, "A"), vec!["d"]);
    }

    #[test]
    fn cyclic_dependencies_terminate() {
        let grammar = Grammar::builder()
            .nonterminal("A")
            .nonterminal("B")
            .terminal("a")
            .terminal("b")
            .production("A", "B")
            .production("B", "A")
            .production("A", "a")
            .production("B", "b")
            .build()
            .unwrap();
        let sets = first_sets(&grammar);
        assert_eq!(terminals(&sets, "A"), vec!["a", "b"]);
        assert_eq!(terminals(&sets, "B"), vec!["b", "a"]);
    }

    #[test]
    fn epsilon_alternatives_record_the_marker() {
        let grammar = Grammar::builder()
            .nonterminal("A")
            .terminal("a")
            .production("A", "a")
            .epsilon("A")
            .build()
            .unwrap();
        let sets = first_sets(&grammar);
        assert!(sets.get("A").unwrap().contains(&SetSymbol::Epsilon));
    }
}
