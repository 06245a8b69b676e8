//! # Skylark
//!
//! A conversational flight booking assistant.
//!
//! Skylark pairs a statistical intent classifier (TF-IDF features into a
//! multinomial naive Bayes model) with a set of multi-turn transaction
//! state machines. Each user message is either classified to start a new
//! transaction or fed into the one already in progress; booking, sign-in
//! and status lookup each run as a bounded forward-only state machine over
//! pluggable collaborator services.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Deterministic, seedable classifier training with held-out metrics
//! - Versioned binary model artifacts with load-or-train recovery
//! - Bounded retries and terminal states for every conversation flow
//! - Collaborator services behind traits, with in-memory implementations

pub mod analysis;
pub mod chat;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod transaction;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
