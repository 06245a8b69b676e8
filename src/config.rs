//! Configuration for the conversation engine and classifier training.
//!
//! Policy values that the original sources hardcode (the 0.40 confidence
//! threshold, the retry bound, split seed and smoothing strength) live here
//! as configuration with documented defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the chat engine and classifier lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Minimum posterior probability for a classification to be acted on.
    /// Anything below is treated as an unrecognized intent.
    pub confidence_threshold: f64,
    /// Consecutive extraction failures tolerated in one transaction state
    /// before the transaction fails.
    pub max_retries: usize,
    /// Path of the persisted model artifact.
    pub model_path: PathBuf,
    /// Path of the labeled training dataset (CSV with `text,intent` columns).
    pub dataset_path: PathBuf,
    /// Training configuration.
    pub training: TrainingConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.40,
            max_retries: 3,
            model_path: PathBuf::from("intent_model.bin"),
            dataset_path: PathBuf::from("data/intents.csv"),
            training: TrainingConfig::default(),
        }
    }
}

/// Configuration for classifier training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of examples held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the stratified train/test split. A fixed seed makes `train`
    /// deterministic for a given dataset.
    pub split_seed: u64,
    /// Additive smoothing strength for the naive Bayes likelihoods.
    pub smoothing_alpha: f64,
    /// Minimum number of training documents an n-gram must appear in to be
    /// kept in the vocabulary.
    pub min_df: usize,
    /// Maximum fraction of training documents an n-gram may appear in
    /// before it is pruned as uninformative.
    pub max_df: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            split_seed: 42,
            smoothing_alpha: 1.0,
            min_df: 1,
            max_df: 1.0,
        }
    }
}
