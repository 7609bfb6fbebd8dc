use indexmap::{IndexMap, IndexSet};

use crate::grammar::Grammar;
use crate::item::Item;

/// The original grammar extended with a fresh start symbol `S'` and a
/// single production `S' -> S`, projected into dot-0 items.
///
/// Epsilon alternatives never become items; they only matter for the
/// FIRST/FOLLOW computation, which reads the original grammar.
#[derive(Debug, Clone)]
pub struct AugmentedGrammar {
    start: String,
    original_start: String,
    productions: IndexMap<String, Vec<Item>>,
    nonterminals: IndexSet<String>,
}

impl AugmentedGrammar {
    /// The synthetic start symbol.
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn original_start(&self) -> &str {
        &self.original_start
    }

    /// Dot-0 items of one nonterminal, in declaration order.
    pub fn items_of(&self, nonterminal: &str) -> &[Item] {
        self.productions
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All dot-0 items, augmented start production first.
    pub fn iter_items(&self) -> impl Iterator<Item = &Item> {
        self.productions.values().flatten()
    }

    pub fn has_productions(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol)
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.nonterminals.contains(symbol)
    }

    /// The complete item `S' -> S .` whose presence marks the accept state.
    pub fn accept_item(&self) -> Item {
        Item::new(vec![self.original_start.clone()], 1)
    }
}

/// Builds the augmented grammar: `S' -> S` plus a dot-0 item per
/// non-epsilon production body.
pub fn augment(grammar: &Grammar) -> AugmentedGrammar {
    let original_start = grammar.start().to_string();

    // Prime the fresh symbol until it clashes with nothing.
    let mut start = format!("{original_start}'");
    while grammar.is_nonterminal(&start) || grammar.is_terminal(&start) {
        start.push('\'');
    }

    let mut productions: IndexMap<String, Vec<Item>> = IndexMap::new();
    productions.insert(start.clone(), vec![Item::start(vec![original_start.clone()])]);

    for (head, bodies) in grammar.productions() {
        let items = productions.entry(head.to_string()).or_default();
        for body in bodies {
            if let Some(symbols) = body.as_symbols() {
                items.push(Item::start(symbols.to_vec()));
            }
        }
    }

    let mut nonterminals: IndexSet<String> = IndexSet::new();
    nonterminals.insert(start.clone());
    nonterminals.extend(grammar.nonterminals().map(str::to_string));

    AugmentedGrammar {
        start,
        original_start,
        productions,
        nonterminals,
    }
}
