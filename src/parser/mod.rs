//! The table-driven LR parser.
//!
//! The parser owns nothing but a reference to the [`ParsingTable`]; all
//! per-line state (the state stack, the symbol stack, the cursor) lives
//! in a [`Configuration`] rebuilt for every line, so one bad line never
//! poisons the next.

use itertools::Itertools;

use crate::automaton::StateId;
use crate::grammar::END;
use crate::table::{Action, ParsingTable};

pub mod recovery;

pub use recovery::{Recovery, RecoveryAction, SyntaxErrorKind, SyntaxReport};

/// Verdict for one token line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    pub accepted: bool,
    /// Diagnostic for rejected lines; `None` on acceptance.
    pub report: Option<SyntaxReport>,
    /// Reduce rules applied, in order ("R3", "R2", …).
    pub reductions: Vec<String>,
}

impl LineResult {
    fn accepted(reductions: Vec<String>) -> Self {
        Self {
            accepted: true,
            report: None,
            reductions,
        }
    }

    fn rejected(report: SyntaxReport, reductions: Vec<String>) -> Self {
        Self {
            accepted: false,
            report: Some(report),
            reductions,
        }
    }

    /// The applied reductions on acceptance, or [`Error::Syntax`] with
    /// the diagnostic on rejection.
    pub fn into_result(self) -> crate::Result<Vec<String>> {
        match self.report {
            None => Ok(self.reductions),
            Some(report) => Err(crate::Error::Syntax(report)),
        }
    }
}

/// Aggregate verdicts over a batch of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub results: Vec<LineResult>,
    pub accepted: usize,
    pub rejected: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "lines parsed: {}", self.total())?;
        writeln!(f, "accepted:     {}", self.accepted)?;
        writeln!(f, "rejected:     {}", self.rejected)?;
        let rate = if self.total() == 0 {
            100.0
        } else {
            self.accepted as f64 * 100.0 / self.total() as f64
        };
        write!(f, "success rate: {rate:.1}%")
    }
}

/// One in-flight parse: the twin stacks and the input cursor.
#[derive(Debug)]
struct Configuration {
    states: Vec<StateId>,
    symbols: Vec<String>,
    tokens: Vec<String>,
    cursor: usize,
}

impl Configuration {
    /// Starts in state 0 with an empty symbol stack; appends the end
    /// marker if the line lacks one.
    fn new(tokens: &[String]) -> Self {
        let mut tokens = tokens.to_vec();
        if tokens.last().map(String::as_str) != Some(END) {
            tokens.push(END.to_string());
        }
        Self {
            states: vec![0],
            symbols: Vec::new(),
            tokens,
            cursor: 0,
        }
    }

    fn current_state(&self) -> StateId {
        *self.states.last().unwrap_or(&0)
    }

    fn lookahead(&self) -> &str {
        self.tokens
            .get(self.cursor)
            .map(String::as_str)
            .unwrap_or(END)
    }

    fn shift(&mut self, to: StateId) {
        self.symbols.push(self.lookahead().to_string());
        self.states.push(to);
        self.cursor += 1;
    }

    /// Pops the reduced body off both stacks and pushes the head. The
    /// state stack keeps its bottom entry even against a malformed
    /// table.
    fn reduce(&mut self, head: &str, body_len: usize) {
        let symbols_len = self.symbols.len().saturating_sub(body_len);
        self.symbols.truncate(symbols_len);
        let states_len = self.states.len().saturating_sub(body_len).max(1);
        self.states.truncate(states_len);
        self.symbols.push(head.to_string());
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} | {}",
            self.states.iter().join(" "),
            self.symbols.iter().join(" "),
            self.tokens[self.cursor..].iter().join(" "),
        )
    }
}

/// Drives token lines through a built [`ParsingTable`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'t> {
    table: &'t ParsingTable,
}

impl<'t> Parser<'t> {
    pub fn new(table: &'t ParsingTable) -> Self {
        Self { table }
    }

    /// Runs the shift/reduce loop over one line.
    ///
    /// A missing ACTION or GOTO entry rejects the line with a
    /// [`SyntaxReport`]; the recovery strategy in it is advisory.
    pub fn parse_line(&self, tokens: &[String]) -> LineResult {
        let mut configuration = Configuration::new(tokens);
        let mut recovery = Recovery::new();
        let mut reductions = Vec::new();

        loop {
            let state = configuration.current_state();
            let Some(action) = self.table.action(state, configuration.lookahead()) else {
                let report = recovery.diagnose(
                    self.table,
                    state,
                    &configuration.tokens,
                    configuration.cursor,
                );
                return LineResult::rejected(report, reductions);
            };

            match action.clone() {
                Action::Accept => return LineResult::accepted(reductions),
                Action::Shift(to) => configuration.shift(to),
                Action::Reduce(rule) => {
                    let Some(entry) = self.table.reduce_entry(&rule) else {
                        let report = recovery.diagnose(
                            self.table,
                            state,
                            &configuration.tokens,
                            configuration.cursor,
                        );
                        return LineResult::rejected(report, reductions);
                    };
                    configuration.reduce(&entry.head, entry.body.len());

                    let uncovered = configuration.current_state();
                    let Some(goto) = self.table.goto(uncovered, &entry.head) else {
                        let report = recovery.diagnose(
                            self.table,
                            uncovered,
                            &configuration.tokens,
                            configuration.cursor,
                        );
                        return LineResult::rejected(report, reductions);
                    };
                    configuration.states.push(goto);
                    reductions.push(rule);
                }
            }
        }
    }

    /// Parses each line independently and tallies the verdicts.
    pub fn parse_lines<I, L>(&self, lines: I) -> RunSummary
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[String]>,
    {
        let mut summary = RunSummary::default();
        for line in lines {
            let result = self.parse_line(line.as_ref());
            if result.accepted {
                summary.accepted += 1;
            } else {
                summary.rejected += 1;
            }
            summary.results.push(result);
        }
        summary
    }
}

/// Splits a whitespace-separated line into tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
