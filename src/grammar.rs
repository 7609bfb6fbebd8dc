use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::{Error, Result};

/// The end-of-input marker appended to every token line.
pub const END: &str = "$";

/// One right-hand side of a production: a symbol sequence, or epsilon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Body {
    Symbols(Vec<String>),
    Epsilon,
}

impl Body {
    pub fn symbols<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self::Symbols(symbols.into_iter().map(Into::into).collect())
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Self::Epsilon)
    }

    pub fn as_symbols(&self) -> Option<&[String]> {
        match self {
            Self::Symbols(symbols) => Some(symbols),
            Self::Epsilon => None,
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbols(symbols) => symbols.iter().join(" ").fmt(f),
            Self::Epsilon => "ε".fmt(f),
        }
    }
}

/// An immutable context-free grammar as delivered by an external
/// grammar-definition reader.
///
/// Nonterminal order is preserved; the first nonterminal is the start
/// symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: IndexMap<String, Vec<Body>>,
    terminals: IndexSet<String>,
    nonterminals: IndexSet<String>,
    start: String,
}

impl Grammar {
    /// Validates and freezes a grammar. The start symbol is the first
    /// nonterminal in insertion order.
    pub fn new(
        productions: IndexMap<String, Vec<Body>>,
        terminals: IndexSet<String>,
        nonterminals: IndexSet<String>,
    ) -> Result<Self> {
        let start = nonterminals
            .first()
            .ok_or_else(|| Error::Grammar("grammar has no nonterminals".into()))?
            .clone();

        if let Some(symbol) = terminals.intersection(&nonterminals).next() {
            return Err(Error::Grammar(format!(
                "symbol {symbol:?} is declared both terminal and nonterminal"
            )));
        }

        for (head, bodies) in &productions {
            if !nonterminals.contains(head) {
                return Err(Error::Grammar(format!(
                    "production head {head:?} is not a declared nonterminal"
                )));
            }
            for body in bodies {
                let Some(symbols) = body.as_symbols() else {
                    continue;
                };
                if symbols.is_empty() {
                    return Err(Error::Grammar(format!(
                        "empty production body for {head:?} (use Body::Epsilon)"
                    )));
                }
                for symbol in symbols {
                    if !terminals.contains(symbol) && !nonterminals.contains(symbol) {
                        return Err(Error::Grammar(format!(
                            "production {head} -> {body} references undeclared symbol {symbol:?}"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            productions,
            terminals,
            nonterminals,
            start,
        })
    }

    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn productions(&self) -> impl Iterator<Item = (&str, &[Body])> {
        self.productions
            .iter()
            .map(|(head, bodies)| (head.as_str(), bodies.as_slice()))
    }

    pub fn bodies(&self, nonterminal: &str) -> &[Body] {
        self.productions
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(String::as_str)
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.nonterminals.iter().map(String::as_str)
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.nonterminals.contains(symbol)
    }

    /// True if the nonterminal derives epsilon directly.
    pub fn has_epsilon_alternative(&self, nonterminal: &str) -> bool {
        self.bodies(nonterminal).iter().any(Body::is_epsilon)
    }

    /// Recovers the head of the production whose body equals `symbols`
    /// (first match in declaration order).
    pub fn head_of_body(&self, symbols: &[String]) -> Option<&str> {
        self.productions().find_map(|(head, bodies)| {
            bodies
                .iter()
                .any(|body| body.as_symbols() == Some(symbols))
                .then_some(head)
        })
    }
}

/// Incremental construction of a [`Grammar`], in declaration order.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    productions: IndexMap<String, Vec<Body>>,
    terminals: IndexSet<String>,
    nonterminals: IndexSet<String>,
}

impl GrammarBuilder {
    pub fn nonterminal(mut self, name: &str) -> Self {
        self.nonterminals.insert(name.to_string());
        self
    }

    pub fn terminal(mut self, name: &str) -> Self {
        self.terminals.insert(name.to_string());
        self
    }

    /// Adds `head -> symbols`, splitting the body on whitespace.
    pub fn production(mut self, head: &str, body: &str) -> Self {
        self.productions
            .entry(head.to_string())
            .or_default()
            .push(Body::symbols(body.split_whitespace()));
        self
    }

    pub fn epsilon(mut self, head: &str) -> Self {
        self.productions
            .entry(head.to_string())
            .or_default()
            .push(Body::Epsilon);
        self
    }

    pub fn build(self) -> Result<Grammar> {
        Grammar::new(self.productions, self.terminals, self.nonterminals)
    }
}
