//! Conversation driver.
//!
//! [`Chatbot`] owns the session and routes each incoming message: while a
//! transaction is active the message is fed to it, otherwise the message is
//! classified and either starts a transaction, gets a direct small-talk
//! reply, or falls through to a clarification prompt when the classifier is
//! not confident enough.
//!
//! Two routing rules sit above the active transaction:
//!
//! - a cancel command abandons the active transaction immediately,
//! - a message confidently classified as a transaction-starting intent is
//!   rejected while another transaction is in progress, unless the active
//!   transaction explicitly absorbs it (a booking waiting on sign-in
//!   absorbs authentication intents).

use log::debug;

use crate::classifier::IntentClassifier;
use crate::config::ChatConfig;
use crate::services::Services;
use crate::session::Session;
use crate::transaction::{Transaction, kind_for, resolve};

/// Messages that abandon the active transaction.
const CANCEL_COMMANDS: &[&str] = &["cancel", "never mind", "nevermind", "forget it"];

/// Messages that sign the user out.
const LOGOUT_COMMANDS: &[&str] = &["logout", "log out", "sign out"];

/// The conversation driver: classifier, collaborators and one session.
#[derive(Debug)]
pub struct Chatbot {
    classifier: IntentClassifier,
    services: Services,
    config: ChatConfig,
    session: Session,
}

impl Chatbot {
    /// Build a chatbot around a trained classifier and a service bundle.
    pub fn new(classifier: IntentClassifier, services: Services, config: ChatConfig) -> Self {
        Chatbot {
            classifier,
            services,
            config,
            session: Session::new(),
        }
    }

    /// Opening message shown before the first user turn.
    pub fn greeting(&self) -> String {
        "Hello! I can help you book flights, check a booking's status, or sign in. What would you like to do?"
            .to_string()
    }

    /// The conversation state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Consume one user message and produce the reply.
    pub fn process_message(&mut self, input: &str) -> String {
        let input = input.trim();
        if input.is_empty() {
            return "Say something and I'll do my best to help.".to_string();
        }

        if is_command(input, CANCEL_COMMANDS) {
            return if self.session.active.take().is_some() {
                "Okay, I've cancelled that. What would you like to do instead?".to_string()
            } else {
                "There's nothing in progress to cancel.".to_string()
            };
        }

        if is_command(input, LOGOUT_COMMANDS) {
            return if self.session.user.take().is_some() {
                "You've been signed out.".to_string()
            } else {
                "You're not signed in.".to_string()
            };
        }

        match self.session.active.take() {
            Some(active) => self.continue_transaction(active, input),
            None => self.start_turn(input),
        }
    }

    /// Feed a message to the active transaction, unless it is a competing
    /// transaction request.
    fn continue_transaction(&mut self, mut active: Transaction, input: &str) -> String {
        let classification = self.classifier.predict(input);
        debug!(
            "mid-transaction classification: {} ({:.3})",
            classification.intent, classification.confidence
        );

        if classification.confidence >= self.config.confidence_threshold
            && let Some(kind) = kind_for(&classification.intent)
            && !active.absorbs(kind, &self.session)
        {
            let reply = format!(
                "You already have a {} in progress. Please finish it first, or say \"cancel\" to abandon it.",
                active.kind()
            );
            self.session.active = Some(active);
            return reply;
        }

        let reply = active.step(input, &mut self.session, &self.services);
        if !active.is_terminal() {
            self.session.active = Some(active);
        }
        reply
    }

    /// Classify a message with no transaction in progress and route it.
    fn start_turn(&mut self, input: &str) -> String {
        let classification = self.classifier.predict(input);
        debug!(
            "classified \"{input}\" as {} ({:.3})",
            classification.intent, classification.confidence
        );

        if classification.confidence < self.config.confidence_threshold {
            return self.fallback_reply();
        }

        match resolve(&classification.intent, &self.config) {
            Some(mut transaction) => {
                let reply = transaction.step(input, &mut self.session, &self.services);
                if !transaction.is_terminal() {
                    self.session.active = Some(transaction);
                }
                reply
            }
            None => self.small_talk_reply(&classification.intent),
        }
    }

    fn small_talk_reply(&self, intent: &str) -> String {
        match intent {
            "greeting" => self.greeting(),
            "goodbye" => "Goodbye! Safe travels.".to_string(),
            "thanks" => "You're welcome! Anything else I can help with?".to_string(),
            _ => self.fallback_reply(),
        }
    }

    fn fallback_reply(&self) -> String {
        "I'm sorry, I didn't quite understand that. You can ask me to book a flight, check a booking's status, or log in."
            .to_string()
    }
}

/// Whole-message command check.
fn is_command(input: &str, commands: &[&str]) -> bool {
    let normalized = input.to_lowercase();
    let normalized = normalized.trim_end_matches(['.', '!']);
    commands.contains(&normalized)
}
