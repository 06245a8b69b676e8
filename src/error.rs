//! Error types for the Skylark library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SkylarkError`] enum.
//!
//! # Examples
//!
//! ```
//! use skylark::error::{Result, SkylarkError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SkylarkError::dataset("missing `intent` column"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Skylark operations.
///
/// Uses the `thiserror` crate for the `Error` trait implementation and
/// provides convenient constructor methods for the common variants.
#[derive(Error, Debug)]
pub enum SkylarkError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or missing training data. Fatal at training time.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// A persisted model artifact could not be read back. Recoverable by
    /// retraining from the dataset.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Text analysis errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Failure reported by an external collaborator (auth, flight search,
    /// booking creation).
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SkylarkError.
pub type Result<T> = std::result::Result<T, SkylarkError>;

impl SkylarkError {
    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        SkylarkError::Dataset(msg.into())
    }

    /// Create a new model load error.
    pub fn model_load<S: Into<String>>(msg: S) -> Self {
        SkylarkError::ModelLoad(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SkylarkError::Analysis(msg.into())
    }

    /// Create a new collaborator error.
    pub fn collaborator<S: Into<String>>(msg: S) -> Self {
        SkylarkError::Collaborator(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SkylarkError::Serialization(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        SkylarkError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SkylarkError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SkylarkError::dataset("empty label in row 3");
        assert_eq!(error.to_string(), "Dataset error: empty label in row 3");

        let error = SkylarkError::model_load("version mismatch");
        assert_eq!(error.to_string(), "Model load error: version mismatch");

        let error = SkylarkError::collaborator("no seats available");
        assert_eq!(error.to_string(), "Collaborator error: no seats available");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let skylark_error = SkylarkError::from(io_error);

        match skylark_error {
            SkylarkError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
