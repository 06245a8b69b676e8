//! Labeled training data loading.
//!
//! The training dataset is a UTF-8 CSV file with a header row and the
//! columns `text,intent`, one example per row. The label vocabulary is
//! defined by the data, not hardcoded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkylarkError};

/// One labeled training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentExample {
    /// Utterance text.
    pub text: String,
    /// Intent label.
    pub intent: String,
}

/// Load training examples from a CSV file with `text,intent` columns.
///
/// A missing file, missing columns, empty texts or empty labels are all
/// dataset errors; training aborts rather than learning from bad rows.
pub fn load_examples<P: AsRef<Path>>(path: P) -> Result<Vec<IntentExample>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SkylarkError::dataset(format!(
            "dataset not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let has_columns = headers.iter().any(|h| h == "text") && headers.iter().any(|h| h == "intent");
    if !has_columns {
        return Err(SkylarkError::dataset(format!(
            "dataset must have `text` and `intent` columns, found: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut examples = Vec::new();
    for (row, record) in reader.deserialize::<IntentExample>().enumerate() {
        let example =
            record.map_err(|e| SkylarkError::dataset(format!("row {}: {e}", row + 1)))?;

        if example.text.trim().is_empty() {
            return Err(SkylarkError::dataset(format!("row {}: empty text", row + 1)));
        }
        if example.intent.trim().is_empty() {
            return Err(SkylarkError::dataset(format!(
                "row {}: empty intent label",
                row + 1
            )));
        }

        examples.push(example);
    }

    if examples.is_empty() {
        return Err(SkylarkError::dataset("dataset contains no examples"));
    }

    Ok(examples)
}
