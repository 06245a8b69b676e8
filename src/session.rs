//! Per-conversation state.

use crate::services::UserInfo;
use crate::transaction::Transaction;

/// State of one conversation: the authenticated user, if any, and the
/// transaction currently in progress, if any.
///
/// Owned by the conversation driver; transactions receive it mutably for
/// the duration of a single step.
#[derive(Debug, Default)]
pub struct Session {
    /// The signed-in user.
    pub user: Option<UserInfo>,
    /// The transaction in progress.
    pub active: Option<Transaction>,
}

impl Session {
    /// Create an empty session: no user, no active transaction.
    pub fn new() -> Self {
        Session::default()
    }

    /// Whether the session is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
