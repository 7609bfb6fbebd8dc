//! LR(0) parsing tables built from plain context-free grammars.
//!
//! The pipeline runs in four stages:
//!
//! 1. [`Grammar`] declares terminals, nonterminals and productions,
//!    then [`augment`] adds the fresh start production `S' -> S`.
//! 2. [`AutomatonBuilder`] derives the item-set automaton: states are
//!    sets of dotted items, transitions follow the symbol after each
//!    dot.
//! 3. [`first_sets`] / [`follow_sets`] compute the classic FIRST and
//!    FOLLOW sets, and [`ParsingTable::build`] merges them with the
//!    automaton into the ACTION/GOTO tables plus a reduce dictionary.
//! 4. [`Parser`] drives whitespace-tokenized lines through the table
//!    with the usual twin-stack shift/reduce loop.
//!
//! ```
//! use lrtab::{Grammar, Parser, build_tables};
//!
//! let grammar = Grammar::builder()
//!     .nonterminal("E")
//!     .terminal("n")
//!     .terminal("(")
//!     .terminal(")")
//!     .production("E", "( E )")
//!     .production("E", "n")
//!     .build()?;
//!
//! let table = build_tables(&grammar)?;
//! let parser = Parser::new(&table);
//!
//! let line: Vec<String> = ["(", "n", ")"].map(String::from).into();
//! assert!(parser.parse_line(&line).accepted);
//! # Ok::<(), lrtab::Error>(())
//! ```

pub mod augment;
pub mod automaton;
pub mod error;
pub mod grammar;
pub mod item;
pub mod parser;
pub mod sets;
pub mod table;

pub use augment::{augment, AugmentedGrammar};
pub use automaton::{Automaton, AutomatonBuilder, Seeding, State, StateId};
pub use error::{Error, Result};
pub use grammar::{Body, Grammar, GrammarBuilder, END};
pub use item::Item;
pub use parser::{
    tokenize, LineResult, Parser, Recovery, RecoveryAction, RunSummary, SyntaxErrorKind,
    SyntaxReport,
};
pub use sets::{first_sets, follow_sets, FirstSets, FollowSets, SetSymbol};
pub use table::{Action, ParsingTable, ReduceEntry};

/// Runs the whole table-construction pipeline with default settings.
pub fn build_tables(grammar: &Grammar) -> Result<ParsingTable> {
    let augmented = augment(grammar);
    let automaton = AutomatonBuilder::new(&augmented).build()?;
    let first = first_sets(grammar);
    let follow = follow_sets(grammar, &first);
    ParsingTable::build(grammar, &automaton, &follow)
}

#[cfg(test)]
pub mod fixtures {
    use crate::grammar::Grammar;
    use crate::table::ParsingTable;

    /// The running example used across the unit tests: conjunctions
    /// and disjunctions of sentences, with bracketed nesting.
    ///
    /// ```text
    /// S -> S ^ P | P
    /// P -> P V Q | Q
    /// Q -> [ S ] | sentence
    /// ```
    pub fn sentence_grammar() -> Grammar {
        Grammar::builder()
            .nonterminal("S")
            .nonterminal("P")
            .nonterminal("Q")
            .terminal("^")
            .terminal("V")
            .terminal("[")
            .terminal("]")
            .terminal("sentence")
            .production("S", "S ^ P")
            .production("S", "P")
            .production("P", "P V Q")
            .production("P", "Q")
            .production("Q", "[ S ]")
            .production("Q", "sentence")
            .build()
            .unwrap()
    }

    pub fn sentence_table() -> ParsingTable {
        crate::build_tables(&sentence_grammar()).unwrap()
    }
}
