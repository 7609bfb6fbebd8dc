use serde::{Deserialize, Serialize};

use crate::automaton::StateId;

/// One ACTION cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Shift(StateId),
    /// Reduce by the named rule ("R1", "R2", …) in the reduce dictionary.
    Reduce(String),
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(to) => write!(f, "s{to}"),
            Action::Reduce(rule) => rule.fmt(f),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/// The production behind a reduce rule: which state reduces, the head
/// nonterminal pushed back, and the body whose length is popped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReduceEntry {
    pub state: StateId,
    pub head: String,
    pub body: Vec<String>,
}

impl std::fmt::Display for ReduceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} (state {})",
            self.head,
            self.body.join(" "),
            self.state
        )
    }
}
