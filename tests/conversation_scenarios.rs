//! End-to-end conversation tests against the shipped intent dataset.

use std::path::Path;
use std::sync::Arc;

use chrono::Days;

use skylark::chat::Chatbot;
use skylark::classifier::{IntentClassifier, load_examples};
use skylark::config::{ChatConfig, TrainingConfig};
use skylark::services::{
    InMemoryAuthService, InMemoryBookingService, InMemoryFlightService, Services,
};
use skylark::transaction::TransactionKind;

fn trained_classifier() -> IntentClassifier {
    let dataset = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/intents.csv");
    let examples = load_examples(dataset).expect("shipped dataset loads");
    IntentClassifier::fit(&examples, &TrainingConfig::default()).expect("dataset fits")
}

fn chatbot_with(services: Services) -> Chatbot {
    Chatbot::new(trained_classifier(), services, ChatConfig::default())
}

fn chatbot() -> Chatbot {
    chatbot_with(Services {
        auth: Arc::new(InMemoryAuthService::with_user("Ada", "ada@example.com", "hunter2")),
        flight: Arc::new(InMemoryFlightService::with_sample_flights()),
        booking: Arc::new(InMemoryBookingService::new()),
    })
}

fn future(days: u64) -> String {
    (chrono::Local::now().date_naive() + Days::new(days)).to_string()
}

#[test]
fn test_booking_utterance_clears_threshold() {
    let classifier = trained_classifier();
    let result = classifier.predict("book a flight to Paris");
    assert_eq!(result.intent, "book_flight");
    assert!(result.confidence >= 0.40);
}

#[test]
fn test_booking_happy_path_end_to_end() {
    let mut bot = chatbot();

    // Sign in up front, then book
    bot.process_message("i want to log in");
    bot.process_message("ada@example.com");
    let reply = bot.process_message("hunter2");
    assert!(reply.contains("successful"));
    assert!(bot.session().is_authenticated());

    let reply = bot.process_message("i want to book a flight");
    assert!(reply.contains("departure city"));

    let reply = bot.process_message("London");
    assert!(reply.contains("destination"));

    let reply = bot.process_message("Paris");
    assert!(reply.contains("outbound date"));

    let reply = bot.process_message(&future(10));
    assert!(reply.contains("travel class"));

    let reply = bot.process_message("economy");
    assert!(reply.contains("available flights"));

    let reply = bot.process_message("1");
    assert!(reply.contains("summary"));

    let reply = bot.process_message("yes");
    assert!(reply.contains("reference number"));
    assert!(bot.session().active.is_none());
}

#[test]
fn test_round_trip_booking_and_status_lookup() {
    let mut bot = chatbot();

    bot.process_message("i want to log in");
    bot.process_message("ada@example.com");
    bot.process_message("hunter2");

    bot.process_message("book a round trip flight");
    bot.process_message("London");
    bot.process_message("Rome");
    bot.process_message(&future(10));
    let reply = bot.process_message(&future(14));
    assert!(reply.contains("travel class"));

    bot.process_message("business");
    bot.process_message("1");
    let confirmation = bot.process_message("yes");
    let reference = confirmation
        .rsplit(": ")
        .next()
        .expect("reply ends with the reference")
        .trim()
        .to_string();
    assert_eq!(reference.len(), 6);

    // Look the booking up by its reference
    let reply = bot.process_message("check my booking status");
    assert!(reply.contains("reference"));

    let reply = bot.process_message(&reference);
    assert!(reply.contains("confirmed"));
    assert!(reply.contains(&reference));
    assert!(bot.session().active.is_none());
}

#[test]
fn test_unrecognized_input_gets_fallback() {
    let mut bot = chatbot();

    let reply = bot.process_message("squeamish ossifrage incantation");
    assert!(reply.contains("didn't quite understand"));
    assert!(bot.session().active.is_none());

    // Small talk is answered directly, still without a transaction
    let reply = bot.process_message("thank you so much");
    assert!(reply.contains("welcome"));
    assert!(bot.session().active.is_none());
}

#[test]
fn test_retry_exhaustion_returns_session_to_idle() {
    let mut bot = chatbot();

    bot.process_message("i want to book a flight");
    assert!(bot.session().active.is_some());

    // Four unusable answers against the default budget of three retries
    bot.process_message("qwerty");
    bot.process_message("asdfgh");
    bot.process_message("zxcvbn");
    let reply = bot.process_message("uiophj");
    assert!(reply.contains("stopped this booking"));
    assert!(bot.session().active.is_none());

    // The session is usable again
    let reply = bot.process_message("i want to book a flight");
    assert!(reply.contains("departure city"));
}

#[test]
fn test_competing_intent_rejected_while_booking() {
    let mut bot = chatbot();

    bot.process_message("i want to book a flight");
    bot.process_message("London");

    let reply = bot.process_message("i want to log in");
    assert!(reply.contains("already have a booking in progress"));
    assert_eq!(
        bot.session().active.as_ref().map(|t| t.kind()),
        Some(TransactionKind::Booking)
    );

    // The flow picks up exactly where it left off
    let reply = bot.process_message("Paris");
    assert!(reply.contains("outbound date"));

    // Cancelling frees the session for the competing request
    bot.process_message("cancel");
    let reply = bot.process_message("i want to log in");
    assert!(reply.contains("email"));
}

#[test]
fn test_booking_pauses_for_registration_at_confirmation() {
    let mut bot = chatbot_with(Services::in_memory());

    bot.process_message("i want to book a flight");
    bot.process_message("London");
    bot.process_message("Berlin");
    bot.process_message(&future(7));
    bot.process_message("first");
    let reply = bot.process_message("1");
    assert!(reply.contains("summary"));

    // Not signed in: confirming routes through the sign-in gate
    let reply = bot.process_message("yes");
    assert!(reply.contains("logged in"));

    bot.process_message("register a new account");
    bot.process_message("grace@example.com");
    bot.process_message("s3cret");
    let reply = bot.process_message("Grace");
    assert!(reply.contains("summary"));
    assert!(bot.session().is_authenticated());

    let reply = bot.process_message("yes");
    assert!(reply.contains("reference number"));
}
