//! Login / registration state machine.
//!
//! ```text
//! Init → AwaitingEmail → AwaitingPassword → Completed   (login)
//! Init → AwaitingEmail → AwaitingPassword → AwaitingName → Completed   (register)
//! ```
//!
//! The `AuthService` call happens once, in the last data-collection state;
//! a collaborator failure is terminal.

use log::debug;

use crate::services::Services;
use crate::session::Session;
use crate::transaction::RetryBudget;

/// States of the authentication flow, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Reading login-vs-register from the triggering utterance.
    Init,
    /// Waiting for the email address.
    AwaitingEmail,
    /// Waiting for the password.
    AwaitingPassword,
    /// Waiting for the display name (registration only).
    AwaitingName,
    /// Terminal: authenticated.
    Completed,
    /// Terminal: retry budget exhausted or collaborator failure.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthAction {
    Login,
    Register,
}

/// Login / registration flow.
#[derive(Debug)]
pub struct AuthFlow {
    state: AuthState,
    action: AuthAction,
    email: Option<String>,
    password: Option<String>,
    retries: RetryBudget,
}

impl AuthFlow {
    /// Create a fresh flow with the given retry bound.
    pub fn new(max_retries: usize) -> Self {
        AuthFlow {
            state: AuthState::Init,
            action: AuthAction::Login,
            email: None,
            password: None,
            retries: RetryBudget::new(max_retries),
        }
    }

    /// Current state.
    pub fn state(&self) -> AuthState {
        self.state
    }

    fn advance(&mut self, state: AuthState) {
        debug!("auth flow: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.retries.reset();
    }

    fn retry_or_fail(&mut self, reprompt: &str) -> String {
        if self.retries.record_failure() {
            self.state = AuthState::Failed;
            "I couldn't complete the sign-in. Let's start over when you're ready.".to_string()
        } else {
            reprompt.to_string()
        }
    }

    /// Consume one message.
    pub fn step(&mut self, input: &str, session: &mut Session, services: &Services) -> String {
        match self.state {
            AuthState::Init => self.handle_init(input),
            AuthState::AwaitingEmail => self.handle_email(input),
            AuthState::AwaitingPassword => self.handle_password(input, session, services),
            AuthState::AwaitingName => self.handle_name(input, session, services),
            AuthState::Completed | AuthState::Failed => {
                "This sign-in is already finished.".to_string()
            }
        }
    }

    fn handle_init(&mut self, input: &str) -> String {
        let lowered = input.to_lowercase();
        let response = if lowered.contains("register") || lowered.contains("sign up") {
            self.action = AuthAction::Register;
            "Let's create an account. Please enter your email:"
        } else {
            self.action = AuthAction::Login;
            "Please enter your email to login:"
        };
        self.advance(AuthState::AwaitingEmail);
        response.to_string()
    }

    fn handle_email(&mut self, input: &str) -> String {
        let email = input.trim();
        if email.is_empty() || !email.contains('@') {
            return self.retry_or_fail("That doesn't look like an email address. Please enter your email:");
        }

        self.email = Some(email.to_string());
        self.advance(AuthState::AwaitingPassword);
        "Please enter your password:".to_string()
    }

    fn handle_password(
        &mut self,
        input: &str,
        session: &mut Session,
        services: &Services,
    ) -> String {
        let password = input.trim();
        if password.is_empty() {
            return self.retry_or_fail("Your password can't be empty. Please enter your password:");
        }

        match self.action {
            AuthAction::Register => {
                self.password = Some(password.to_string());
                self.advance(AuthState::AwaitingName);
                "Please enter your name:".to_string()
            }
            AuthAction::Login => {
                let email = self.email.as_deref().unwrap_or_default();
                match services.auth.login(email, password) {
                    Ok(user) => {
                        session.user = Some(user);
                        self.advance(AuthState::Completed);
                        "Login successful.".to_string()
                    }
                    Err(e) => {
                        self.state = AuthState::Failed;
                        format!("Login failed: {e}")
                    }
                }
            }
        }
    }

    fn handle_name(&mut self, input: &str, session: &mut Session, services: &Services) -> String {
        let name = input.trim();
        if name.is_empty() {
            return self.retry_or_fail("Please enter your name:");
        }

        let email = self.email.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        match services.auth.register(name, email, password) {
            Ok(user) => {
                session.user = Some(user);
                self.advance(AuthState::Completed);
                "Registration successful.".to_string()
            }
            Err(e) => {
                self.state = AuthState::Failed;
                format!("Registration failed: {e}")
            }
        }
    }
}
