use itertools::Itertools;

use crate::automaton::StateId;
use crate::grammar::END;
use crate::table::ParsingTable;

/// Symbols worth scanning ahead for when resynchronizing after an error.
pub const SYNC_SYMBOLS: &[&str] = &["]", ")", "}", ";", END];

/// POP_STACK is only worth trying while the error count is this low.
const POP_STACK_LIMIT: usize = 3;
/// Past this many errors on one line the recovery goes into panic mode
/// and stops proposing anything but ABORT.
const PANIC_THRESHOLD: usize = 5;

/// What went wrong, judged from the cursor position and the token line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The input ended before the parse could complete.
    PrematureEnd,
    /// The last real token before `$` is in place, but something is
    /// missing just before the end.
    MissingSymbol,
    UnexpectedToken,
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrematureEnd => "premature end of input".fmt(f),
            Self::MissingSymbol => "missing expected symbol".fmt(f),
            Self::UnexpectedToken => "unexpected token".fmt(f),
        }
    }
}

/// The strategy the recovery would try, in priority order. Advisory:
/// the driver still rejects the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Inserting this expected token would yield a valid action.
    InsertToken(String),
    /// Skip ahead to the synchronization symbol at this input position.
    SyncForward(usize),
    SkipToken,
    PopStack,
    Abort,
}

impl std::fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsertToken(token) => write!(f, "INSERT_TOKEN({token})"),
            Self::SyncForward(position) => write!(f, "SYNC_FORWARD({position})"),
            Self::SkipToken => "SKIP_TOKEN".fmt(f),
            Self::PopStack => "POP_STACK".fmt(f),
            Self::Abort => "ABORT".fmt(f),
        }
    }
}

/// Everything a collaborator needs to show a syntax error: what, where,
/// what would have been accepted, and what the recovery would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxReport {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub position: usize,
    pub token: String,
    pub expected: Vec<String>,
    pub suggestions: Vec<String>,
    pub strategy: RecoveryAction,
}

impl std::fmt::Display for SyntaxReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: found {:?} at position {}", self.kind, self.token, self.position)?;
        if !self.expected.is_empty() {
            write!(f, ", expected one of: {}", self.expected.iter().join(", "))?;
        }
        write!(f, " [{}]", self.strategy)
    }
}

/// Classifies syntax errors and selects a recovery strategy, keeping a
/// running error count and a panic-mode flag across one parsed line.
#[derive(Debug, Default)]
pub struct Recovery {
    error_count: usize,
    panic_mode: bool,
}

impl Recovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn in_panic_mode(&self) -> bool {
        self.panic_mode
    }

    /// Parsing should stop once the thresholds are exceeded.
    pub fn should_continue(&self) -> bool {
        !self.panic_mode && self.error_count < PANIC_THRESHOLD
    }

    pub fn reset(&mut self) {
        self.error_count = 0;
        self.panic_mode = false;
    }

    /// Builds the diagnostic for a missing ACTION entry.
    pub fn diagnose(
        &mut self,
        table: &ParsingTable,
        state: StateId,
        tokens: &[String],
        position: usize,
    ) -> SyntaxReport {
        self.error_count += 1;
        if self.error_count >= PANIC_THRESHOLD {
            self.panic_mode = true;
        }

        let token = tokens
            .get(position)
            .map(String::as_str)
            .unwrap_or(END)
            .to_string();
        let kind = classify(&token, position, tokens);
        let expected = table.expected_symbols(state);
        let strategy = self.select_strategy(&expected, tokens, position);
        let suggestions = suggest(&token, &expected);
        let message = format!("{kind}: found {token:?} at position {position}");

        SyntaxReport {
            kind,
            message,
            position,
            token,
            expected,
            suggestions,
            strategy,
        }
    }

    /// Strategies in priority order: token insertion, forward
    /// synchronization, token skipping, stack popping, abort.
    fn select_strategy(
        &self,
        expected: &[String],
        tokens: &[String],
        position: usize,
    ) -> RecoveryAction {
        if self.panic_mode {
            return RecoveryAction::Abort;
        }

        // Every expected symbol has an action by construction, so any of
        // them is a viable insertion.
        if let Some(token) = expected.first() {
            return RecoveryAction::InsertToken(token.clone());
        }

        if let Some(sync) = find_sync_point(tokens, position) {
            return RecoveryAction::SyncForward(sync);
        }

        if position < tokens.len() && tokens.get(position).map(String::as_str) != Some(END) {
            return RecoveryAction::SkipToken;
        }

        if self.error_count < POP_STACK_LIMIT {
            return RecoveryAction::PopStack;
        }

        RecoveryAction::Abort
    }
}

fn classify(token: &str, position: usize, tokens: &[String]) -> SyntaxErrorKind {
    if position >= tokens.len() || token == END {
        return SyntaxErrorKind::PrematureEnd;
    }
    if position + 2 == tokens.len() && tokens.last().map(String::as_str) == Some(END) {
        return SyntaxErrorKind::MissingSymbol;
    }
    SyntaxErrorKind::UnexpectedToken
}

/// Scans ahead for the first synchronization symbol at or past the
/// error position.
fn find_sync_point(tokens: &[String], position: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(position)
        .find(|(_, token)| SYNC_SYMBOLS.contains(&token.as_str()))
        .map(|(index, _)| index)
}

fn suggest(token: &str, expected: &[String]) -> Vec<String> {
    let mut suggestions: Vec<String> = expected
        .iter()
        .filter(|candidate| is_typo_likely(token, candidate))
        .map(|candidate| format!("did you mean {candidate:?}?"))
        .collect();
    if suggestions.is_empty() {
        if let Some(candidate) = expected.first() {
            suggestions.push(format!("insert {candidate:?} before {token:?}"));
        }
    }
    suggestions
}

/// A crude typo test: same first character, or lengths within one of
/// each other for short symbols.
fn is_typo_likely(actual: &str, expected: &str) -> bool {
    if actual == expected || actual == END || expected == END {
        return false;
    }
    let same_start = matches!(
        (actual.chars().next(), expected.chars().next()),
        (Some(a), Some(b)) if a == b
    );
    same_start || actual.len().abs_diff(expected.len()) <= 1 && actual.len() <= 3
}
