//! FIRST and FOLLOW set computation.
//!
//! Both solvers collect direct members in a single scan and then run a
//! changed-flag fixed point over the recorded dependencies, so deep or
//! cyclic chains resolve fully.

mod first;
mod follow;

pub use first::{first_sets, FirstSets};
pub use follow::{follow_sets, FollowSets};

/// One element of a FIRST or FOLLOW set.
///
/// `Follow(N)` is a placeholder recorded during the scan, meaning "this
/// set also includes FOLLOW(N)". Resolution expands and removes every
/// placeholder; the solvers never return one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SetSymbol {
    Terminal(String),
    /// The end-of-input marker `$`.
    End,
    Epsilon,
    Follow(String),
}

impl SetSymbol {
    pub fn terminal(symbol: &str) -> Self {
        Self::Terminal(symbol.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Follow(_))
    }
}

impl std::fmt::Display for SetSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(symbol) => symbol.fmt(f),
            Self::End => crate::grammar::END.fmt(f),
            Self::Epsilon => "ε".fmt(f),
            Self::Follow(nonterminal) => write!(f, "FOLLOW({nonterminal})"),
        }
    }
}
