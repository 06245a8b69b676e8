//! Intent label to transaction routing.
//!
//! The mapping from classifier labels to transaction variants lives in one
//! place so the label vocabulary of the training data and the set of
//! transactions stay in sync.

use crate::config::ChatConfig;
use crate::transaction::{AuthFlow, BookingFlow, StatusFlow, Transaction, TransactionKind};

/// Which transaction variant, if any, an intent label starts.
///
/// Labels that carry no multi-turn work (greetings, thanks) map to `None`
/// and are answered directly by the conversation driver.
pub fn kind_for(intent: &str) -> Option<TransactionKind> {
    match intent {
        "book_flight" | "booking" => Some(TransactionKind::Booking),
        "check_status" | "status" | "booking_status" => Some(TransactionKind::Status),
        "login" | "register" | "auth" => Some(TransactionKind::Auth),
        _ => None,
    }
}

/// Instantiate a fresh transaction for an intent label, if the label maps
/// to one.
pub fn resolve(intent: &str, config: &ChatConfig) -> Option<Transaction> {
    let transaction = match kind_for(intent)? {
        TransactionKind::Auth => Transaction::Auth(AuthFlow::new(config.max_retries)),
        TransactionKind::Booking => Transaction::Booking(BookingFlow::new(config.max_retries)),
        TransactionKind::Status => Transaction::Status(StatusFlow::new(config.max_retries)),
    };
    Some(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for() {
        assert_eq!(kind_for("book_flight"), Some(TransactionKind::Booking));
        assert_eq!(kind_for("check_status"), Some(TransactionKind::Status));
        assert_eq!(kind_for("login"), Some(TransactionKind::Auth));
        assert_eq!(kind_for("register"), Some(TransactionKind::Auth));
        assert_eq!(kind_for("greeting"), None);
        assert_eq!(kind_for(""), None);
    }

    #[test]
    fn test_resolve_matches_kind() {
        let config = ChatConfig::default();
        for intent in ["book_flight", "check_status", "login"] {
            let transaction = resolve(intent, &config).unwrap();
            assert_eq!(Some(transaction.kind()), kind_for(intent));
        }
        assert!(resolve("greeting", &config).is_none());
    }
}
