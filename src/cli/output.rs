//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::classifier::TrainingMetrics;
use crate::cli::args::{OutputFormat, SkylarkArgs};
use crate::error::Result;

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub accuracy: f64,
    pub labels: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
}

impl TrainingResult {
    /// Build from a metrics report and the artifact location.
    pub fn from_metrics(metrics: &TrainingMetrics, model_path: &str) -> Self {
        TrainingResult {
            model_path: model_path.to_string(),
            accuracy: metrics.accuracy,
            labels: metrics.labels.clone(),
            n_train: metrics.n_train,
            n_test: metrics.n_test,
        }
    }
}

/// Result structure for one-shot classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    pub text: String,
    pub intent: String,
    pub confidence: f64,
    /// Whether the confidence clears the acting threshold.
    pub recognized: bool,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SkylarkArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SkylarkArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    if let Some(obj) = value.as_object() {
        for (key, field) in obj {
            match field {
                serde_json::Value::Array(items) => {
                    let joined: Vec<String> = items
                        .iter()
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .collect();
                    println!("{key}: {}", joined.join(", "));
                }
                serde_json::Value::Number(n) if n.is_f64() => {
                    println!("{key}: {:.3}", n.as_f64().unwrap_or(0.0));
                }
                serde_json::Value::String(s) => println!("{key}: {s}"),
                other => println!("{key}: {other}"),
            }
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SkylarkArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
