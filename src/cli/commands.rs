//! Command implementations for the skylark CLI.

use std::io::{self, BufRead, Write};

use log::info;

use crate::chat::Chatbot;
use crate::classifier::IntentClassifier;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ChatConfig;
use crate::error::{Result, SkylarkError};
use crate::services::Services;

/// Execute a CLI command.
pub fn execute_command(args: SkylarkArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args.clone(), &args),
        Command::Predict(predict_args) => predict_intent(predict_args.clone(), &args),
        Command::Chat(chat_args) => run_chat(chat_args.clone(), &args),
    }
}

/// Train the classifier and persist the model artifact.
fn train_model(args: TrainArgs, cli_args: &SkylarkArgs) -> Result<()> {
    if args.model.exists() && !args.force {
        return Err(SkylarkError::invalid_operation(
            "Model artifact already exists. Use --force to overwrite.",
        ));
    }

    if cli_args.verbosity() > 0 {
        println!("Training on: {}", args.dataset.display());
    }

    let config = args.training_config();
    let (classifier, metrics) = IntentClassifier::train(&args.dataset, &config)?;
    classifier.save(&args.model)?;

    if cli_args.verbosity() > 1 {
        println!("{metrics}");
    }

    output_result(
        "Model trained successfully",
        &TrainingResult::from_metrics(&metrics, &args.model.to_string_lossy()),
        cli_args,
    )
}

/// Classify a single utterance.
fn predict_intent(args: PredictArgs, cli_args: &SkylarkArgs) -> Result<()> {
    let config = ChatConfig::default();
    let (classifier, _) =
        IntentClassifier::load_or_train(&args.model, &args.dataset, &config.training)?;

    let classification = classifier.predict(&args.text);
    let result = PredictionResult {
        text: args.text.clone(),
        recognized: classification.confidence >= args.threshold,
        intent: classification.intent,
        confidence: classification.confidence,
    };

    output_result("Classification", &result, cli_args)
}

/// Run the interactive chat loop on stdin/stdout.
fn run_chat(args: ChatArgs, cli_args: &SkylarkArgs) -> Result<()> {
    let config = args.chat_config();
    let (classifier, metrics) =
        IntentClassifier::load_or_train(&config.model_path, &config.dataset_path, &config.training)?;
    if let Some(metrics) = metrics {
        info!("trained a fresh model: accuracy {:.3}", metrics.accuracy);
    }

    let mut bot = Chatbot::new(classifier, Services::in_memory(), config);

    if cli_args.verbosity() > 0 {
        println!("Type \"quit\" or \"exit\" to leave.");
        println!();
    }
    println!("Bot: {}", bot.greeting());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("You: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case("quit")
            || input.eq_ignore_ascii_case("exit")
            || input.eq_ignore_ascii_case("bye")
        {
            println!("Bot: Goodbye! Safe travels.");
            break;
        }

        println!("Bot: {}", bot.process_message(input));
    }

    Ok(())
}
