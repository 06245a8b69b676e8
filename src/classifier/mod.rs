//! Statistical intent classification for user utterances.
//!
//! The pipeline follows the classic text-classification recipe: the
//! [`TfIdfVectorizer`] turns an utterance into a fixed-length feature vector
//! over a vocabulary of unigrams and bigrams fitted at training time, and a
//! [`MultinomialNb`] model maps that vector to a posterior distribution over
//! intent labels.
//!
//! # Architecture
//!
//! - [`IntentExample`]: one labeled training row
//! - [`TfIdfVectorizer`]: feature extraction (vocabulary + IDF weighting)
//! - [`MultinomialNb`]: class priors + smoothed conditional likelihoods
//! - [`IntentClassifier`]: train / predict / save / load lifecycle
//! - [`TrainingMetrics`]: held-out accuracy, precision/recall, confusion
//!
//! # Example
//!
//! ```no_run
//! use skylark::classifier::IntentClassifier;
//! use skylark::config::TrainingConfig;
//!
//! # fn main() -> skylark::error::Result<()> {
//! let config = TrainingConfig::default();
//! let (classifier, metrics) = IntentClassifier::train("data/intents.csv", &config)?;
//! println!("accuracy: {:.2}", metrics.accuracy);
//!
//! let result = classifier.predict("I want to book a flight to Paris");
//! println!("{} ({:.2})", result.intent, result.confidence);
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod intent;
pub mod metrics;
pub mod naive_bayes;
pub mod vectorizer;

pub use dataset::{IntentExample, load_examples};
pub use intent::{ARTIFACT_VERSION, Classification, IntentClassifier};
pub use metrics::TrainingMetrics;
pub use naive_bayes::MultinomialNb;
pub use vectorizer::TfIdfVectorizer;
