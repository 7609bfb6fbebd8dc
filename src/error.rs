use thiserror::Error;

use crate::parser::recovery::SyntaxReport;
use crate::table::Action;

/// Everything that can go wrong between receiving a grammar and
/// finishing a parse.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed grammar: {0}")]
    Grammar(String),

    /// Two actions claimed the same (state, terminal) cell. The grammar is
    /// not LR(0)-decidable by this table.
    #[error("conflict in state {state} on symbol {symbol:?}: {existing} vs {incoming}")]
    Conflict {
        state: usize,
        symbol: String,
        existing: Action,
        incoming: Action,
    },

    #[error("{0}")]
    Syntax(SyntaxReport),

    #[error("automaton construction exceeded the state limit of {0}")]
    StateLimit(usize),

    /// A grammar or token source was unavailable.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
