//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ChatConfig, TrainingConfig};

/// Skylark - a conversational flight booking assistant
#[derive(Parser, Debug, Clone)]
#[command(name = "skylark")]
#[command(about = "A conversational flight booking assistant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SkylarkArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SkylarkArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train the intent classifier and save the model artifact
    Train(TrainArgs),

    /// Classify a single utterance
    Predict(PredictArgs),

    /// Start an interactive chat session
    Chat(ChatArgs),
}

/// Arguments for training the intent classifier
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled dataset (CSV with text,intent columns)
    #[arg(short, long, value_name = "DATASET", default_value = "data/intents.csv")]
    pub dataset: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, value_name = "MODEL", default_value = "intent_model.bin")]
    pub model: PathBuf,

    /// Fraction of examples held out for evaluation
    #[arg(long, default_value = "0.2")]
    pub test_fraction: f64,

    /// Seed for the train/test split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Minimum document frequency for vocabulary terms
    #[arg(long, default_value = "1")]
    pub min_df: usize,

    /// Overwrite an existing model artifact
    #[arg(long)]
    pub force: bool,
}

/// Arguments for one-shot classification
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// The utterance to classify
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Path of the model artifact (trained on demand if missing)
    #[arg(short, long, value_name = "MODEL", default_value = "intent_model.bin")]
    pub model: PathBuf,

    /// Labeled dataset used when the model must be trained first
    #[arg(short, long, value_name = "DATASET", default_value = "data/intents.csv")]
    pub dataset: PathBuf,

    /// Confidence below which the intent is reported as unrecognized
    #[arg(long, default_value = "0.4")]
    pub threshold: f64,
}

/// Arguments for the interactive chat session
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Path of the model artifact (trained on demand if missing)
    #[arg(short, long, value_name = "MODEL", default_value = "intent_model.bin")]
    pub model: PathBuf,

    /// Labeled dataset used when the model must be trained first
    #[arg(short, long, value_name = "DATASET", default_value = "data/intents.csv")]
    pub dataset: PathBuf,

    /// Confidence below which a message is treated as unrecognized
    #[arg(long, default_value = "0.4")]
    pub threshold: f64,

    /// Consecutive invalid answers tolerated per question
    #[arg(long, default_value = "3")]
    pub max_retries: usize,
}

impl TrainArgs {
    /// Training configuration with CLI overrides applied.
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            test_fraction: self.test_fraction,
            split_seed: self.seed,
            min_df: self.min_df,
            ..TrainingConfig::default()
        }
    }
}

impl ChatArgs {
    /// Chat configuration with CLI overrides applied.
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            confidence_threshold: self.threshold,
            max_retries: self.max_retries,
            model_path: self.model.clone(),
            dataset_path: self.dataset.clone(),
            training: TrainingConfig::default(),
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_train_command_defaults() {
        let args = SkylarkArgs::try_parse_from(["skylark", "train"]).unwrap();
        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.dataset, PathBuf::from("data/intents.csv"));
            assert_eq!(train_args.model, PathBuf::from("intent_model.bin"));
            assert_eq!(train_args.seed, 42);
            assert!(!train_args.force);
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_predict_command() {
        let args = SkylarkArgs::try_parse_from([
            "skylark",
            "-f",
            "json",
            "predict",
            "book me a flight",
            "--threshold",
            "0.5",
        ])
        .unwrap();

        assert!(matches!(args.output_format, OutputFormat::Json));
        if let Command::Predict(predict_args) = args.command {
            assert_eq!(predict_args.text, "book me a flight");
            assert_eq!(predict_args.threshold, 0.5);
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_verbosity() {
        let args = SkylarkArgs::try_parse_from(["skylark", "-vv", "train"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = SkylarkArgs::try_parse_from(["skylark", "-q", "-v", "train"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_chat_config_overrides() {
        let args = SkylarkArgs::try_parse_from([
            "skylark",
            "chat",
            "--threshold",
            "0.6",
            "--max-retries",
            "1",
        ])
        .unwrap();

        if let Command::Chat(chat_args) = args.command {
            let config = chat_args.chat_config();
            assert_eq!(config.confidence_threshold, 0.6);
            assert_eq!(config.max_retries, 1);
        } else {
            panic!("Expected Chat command");
        }
    }
}
