//! Multi-turn transaction state machines.
//!
//! A [`Transaction`] is one unit of multi-turn work fulfilling a single
//! intent end to end. The set of transactions is closed, so the type is a
//! tagged enum stepped through `match` rather than a trait object.
//!
//! Every variant is a finite state machine with the same shape:
//!
//! - states advance strictly forward; `Completed` and `Failed` are terminal
//!   with no outgoing transitions,
//! - every non-terminal state has one happy-path successor and a retry
//!   self-loop; after a bounded number of consecutive extraction failures
//!   in one state the transaction fails,
//! - all intermediate steps are pure data collection; collaborator calls
//!   happen only on the transition toward `Completed`, and a collaborator
//!   failure is terminal (never retried automatically).

pub mod auth_flow;
pub mod booking_flow;
pub mod factory;
pub mod status_flow;

pub use auth_flow::{AuthFlow, AuthState};
pub use booking_flow::{BookingFlow, BookingState};
pub use factory::{kind_for, resolve};
pub use status_flow::{StatusFlow, StatusState};

use crate::services::Services;
use crate::session::Session;

/// The closed set of transaction variants.
#[derive(Debug)]
pub enum Transaction {
    /// Login / registration flow.
    Auth(AuthFlow),
    /// Flight booking flow.
    Booking(BookingFlow),
    /// Booking status lookup flow.
    Status(StatusFlow),
}

/// Discriminant of [`Transaction`], used when routing intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Login / registration.
    Auth,
    /// Flight booking.
    Booking,
    /// Booking status lookup.
    Status,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransactionKind::Auth => "authentication",
            TransactionKind::Booking => "booking",
            TransactionKind::Status => "status check",
        };
        write!(f, "{name}")
    }
}

impl Transaction {
    /// Which variant this is.
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Auth(_) => TransactionKind::Auth,
            Transaction::Booking(_) => TransactionKind::Booking,
            Transaction::Status(_) => TransactionKind::Status,
        }
    }

    /// Consume one user message in the context of the current state and
    /// return the reply. Stepping a terminal transaction is a no-op reply.
    pub fn step(&mut self, input: &str, session: &mut Session, services: &Services) -> String {
        match self {
            Transaction::Auth(flow) => flow.step(input, session, services),
            Transaction::Booking(flow) => flow.step(input, session, services),
            Transaction::Status(flow) => flow.step(input, services),
        }
    }

    /// Whether the transaction reached `Completed`.
    pub fn is_complete(&self) -> bool {
        match self {
            Transaction::Auth(flow) => flow.state() == AuthState::Completed,
            Transaction::Booking(flow) => flow.state() == BookingState::Completed,
            Transaction::Status(flow) => flow.state() == StatusState::Completed,
        }
    }

    /// Whether the transaction reached `Failed`.
    pub fn is_failed(&self) -> bool {
        match self {
            Transaction::Auth(flow) => flow.state() == AuthState::Failed,
            Transaction::Booking(flow) => flow.state() == BookingState::Failed,
            Transaction::Status(flow) => flow.state() == StatusState::Failed,
        }
    }

    /// Whether the transaction reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.is_complete() || self.is_failed()
    }

    /// Whether a message carrying the given intent should still be fed to
    /// this transaction rather than rejected as a competing request.
    ///
    /// A booking waiting on its sign-in gate absorbs authentication
    /// intents: "login" at that point is an answer, not a new request.
    pub fn absorbs(&self, kind: TransactionKind, session: &Session) -> bool {
        match self {
            Transaction::Booking(flow) => {
                kind == TransactionKind::Auth
                    && flow.state() == BookingState::Confirmation
                    && !session.is_authenticated()
            }
            _ => false,
        }
    }
}

/// Bounded retry counter shared by all flows.
///
/// Counts consecutive extraction failures within a single state; advancing
/// to the next state resets it.
#[derive(Debug, Clone)]
pub(crate) struct RetryBudget {
    attempts: usize,
    max_retries: usize,
}

impl RetryBudget {
    pub(crate) fn new(max_retries: usize) -> Self {
        RetryBudget {
            attempts: 0,
            max_retries,
        }
    }

    /// Record one extraction failure. Returns `true` when the budget is
    /// exhausted and the transaction must fail.
    pub(crate) fn record_failure(&mut self) -> bool {
        self.attempts += 1;
        self.attempts > self.max_retries
    }

    /// Reset on successful extraction or state advance.
    pub(crate) fn reset(&mut self) {
        self.attempts = 0;
    }
}

/// Affirmative answers accepted at confirmation prompts.
const AFFIRMATIVE_WORDS: &[&str] = &["yes", "y", "yeah", "yep", "sure", "confirm", "proceed", "ok", "okay"];

/// Negative answers accepted at confirmation prompts.
const NEGATIVE_WORDS: &[&str] = &["no", "n", "nope", "cancel", "stop", "abort"];

/// Result of parsing a confirmation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Answer {
    Affirmative,
    Negative,
    Unclear,
}

/// Keyword extraction of a yes/no answer.
pub(crate) fn parse_answer(input: &str) -> Answer {
    let words: Vec<String> = input
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect();

    let affirmative = words.iter().any(|w| AFFIRMATIVE_WORDS.contains(&w.as_str()));
    let negative = words.iter().any(|w| NEGATIVE_WORDS.contains(&w.as_str()));

    match (affirmative, negative) {
        (true, false) => Answer::Affirmative,
        (false, true) => Answer::Negative,
        _ => Answer::Unclear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_budget() {
        let mut budget = RetryBudget::new(2);
        assert!(!budget.record_failure());
        assert!(!budget.record_failure());
        assert!(budget.record_failure());

        budget.reset();
        assert!(!budget.record_failure());
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("Yes, go ahead!"), Answer::Affirmative);
        assert_eq!(parse_answer("nope"), Answer::Negative);
        assert_eq!(parse_answer("maybe later"), Answer::Unclear);
        // Conflicting signals stay unclear
        assert_eq!(parse_answer("yes no"), Answer::Unclear);
    }
}
