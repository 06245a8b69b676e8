//! Intent classifier lifecycle: train, predict, save, load.
//!
//! The classifier couples a fitted [`TfIdfVectorizer`] with a
//! [`MultinomialNb`] model. Training fits both on a stratified train split
//! of the labeled dataset and reports metrics on the held-out remainder.
//! The fitted state round-trips through a versioned bincode artifact:
//! `load(save(model))` predicts identically to `model`.

use std::fs;
use std::path::Path;

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::classifier::dataset::{IntentExample, load_examples};
use crate::classifier::metrics::TrainingMetrics;
use crate::classifier::naive_bayes::MultinomialNb;
use crate::classifier::vectorizer::TfIdfVectorizer;
use crate::config::TrainingConfig;
use crate::error::{Result, SkylarkError};

/// Version tag of the persisted model artifact. Bumped on any layout change;
/// a mismatch is a load error and triggers retraining.
pub const ARTIFACT_VERSION: u32 = 1;

/// Result of classifying one utterance.
///
/// `confidence` is the posterior probability of the arg-max label, so it
/// always lies in [0, 1]. Whether the result is trusted is the caller's
/// policy; the classifier never hides the arg-max behind a threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted intent label.
    pub intent: String,
    /// Posterior probability of the predicted label.
    pub confidence: f64,
}

/// Persisted form of a fitted classifier (borrowing side, for writes).
#[derive(Serialize)]
struct ArtifactRef<'a> {
    version: u32,
    labels: &'a [String],
    vectorizer: &'a TfIdfVectorizer,
    model: &'a MultinomialNb,
}

/// Persisted form of a fitted classifier (owned side, for reads).
#[derive(Deserialize)]
struct Artifact {
    version: u32,
    labels: Vec<String>,
    vectorizer: TfIdfVectorizer,
    model: MultinomialNb,
}

/// A trained statistical intent classifier.
pub struct IntentClassifier {
    /// Label set in class-id order.
    labels: Vec<String>,
    vectorizer: TfIdfVectorizer,
    model: MultinomialNb,
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("labels", &self.labels)
            .field("vectorizer", &self.vectorizer)
            .finish()
    }
}

impl IntentClassifier {
    /// Fit a classifier on the given examples without a held-out split.
    pub fn fit(examples: &[IntentExample], config: &TrainingConfig) -> Result<Self> {
        if examples.is_empty() {
            return Err(SkylarkError::dataset("no training examples"));
        }

        let labels = collect_labels(examples);
        let documents: Vec<String> = examples.iter().map(|e| e.text.clone()).collect();

        let mut vectorizer =
            TfIdfVectorizer::with_df_bounds(config.min_df, config.max_df);
        vectorizer.fit(&documents)?;

        let vectors = documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect::<Result<Vec<_>>>()?;
        let classes: Vec<usize> = examples
            .iter()
            .map(|e| label_id(&labels, &e.intent))
            .collect();

        let model =
            MultinomialNb::fit(&vectors, &classes, labels.len(), config.smoothing_alpha)?;

        Ok(IntentClassifier {
            labels,
            vectorizer,
            model,
        })
    }

    /// Train from a labeled CSV dataset.
    ///
    /// Performs a stratified, seeded train/test split, fits on the train
    /// portion and evaluates on the held-out portion. Deterministic for a
    /// given dataset and configuration.
    pub fn train<P: AsRef<Path>>(
        dataset_path: P,
        config: &TrainingConfig,
    ) -> Result<(Self, TrainingMetrics)> {
        let examples = load_examples(dataset_path)?;
        let labels = collect_labels(&examples);
        if labels.len() < 2 {
            return Err(SkylarkError::dataset(
                "dataset must contain at least two distinct intent labels",
            ));
        }

        let (train_idx, test_idx) = stratified_split(&examples, &labels, config);
        let train_set: Vec<IntentExample> =
            train_idx.iter().map(|&i| examples[i].clone()).collect();

        let classifier = Self::fit(&train_set, config)?;

        // Tiny datasets can leave the held-out split empty; fall back to
        // evaluating on the train set so metrics are still well-formed.
        let eval_idx = if test_idx.is_empty() {
            warn!("held-out split is empty; evaluating on the training set");
            &train_idx
        } else {
            &test_idx
        };

        let mut actual = Vec::with_capacity(eval_idx.len());
        let mut predicted = Vec::with_capacity(eval_idx.len());
        for &i in eval_idx {
            actual.push(label_id(&classifier.labels, &examples[i].intent));
            let result = classifier.predict(&examples[i].text);
            predicted.push(label_id(&classifier.labels, &result.intent));
        }

        let metrics =
            TrainingMetrics::compute(&actual, &predicted, &classifier.labels, train_idx.len());
        info!(
            "trained intent classifier: {} labels, {} dims, accuracy {:.3}",
            classifier.labels.len(),
            classifier.vectorizer.vocabulary_size(),
            metrics.accuracy
        );

        Ok((classifier, metrics))
    }

    /// Posterior probability of every known label for the given text.
    ///
    /// Always a probability distribution over [`labels`](Self::labels); an
    /// empty or entirely out-of-vocabulary input degenerates to the class
    /// priors.
    pub fn posterior(&self, text: &str) -> Vec<f64> {
        let vector = self
            .vectorizer
            .transform(text)
            .unwrap_or_else(|_| vec![0.0; self.vectorizer.vocabulary_size()]);
        self.model.predict_proba(&vector)
    }

    /// Classify one utterance. Never fails: the worst case is a
    /// low-confidence distribution over the priors alone.
    pub fn predict(&self, text: &str) -> Classification {
        let proba = self.posterior(text);
        let (class, confidence) = proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(class, &p)| (class, p))
            .unwrap_or((0, 0.0));

        Classification {
            intent: self.labels[class].clone(),
            confidence,
        }
    }

    /// The label set this classifier was trained on, in class-id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Persist the fitted classifier to a versioned binary artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let artifact = ArtifactRef {
            version: ARTIFACT_VERSION,
            labels: &self.labels,
            vectorizer: &self.vectorizer,
            model: &self.model,
        };
        let encoded = bincode::serde::encode_to_vec(&artifact, bincode::config::standard())
            .map_err(|e| SkylarkError::serialization(format!("model artifact: {e}")))?;
        fs::write(path.as_ref(), encoded)?;
        info!("model saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a classifier from a persisted artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|e| SkylarkError::model_load(format!("{}: {e}", path.as_ref().display())))?;

        let (artifact, _): (Artifact, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard())
                .map_err(|e| SkylarkError::model_load(format!("corrupt artifact: {e}")))?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(SkylarkError::model_load(format!(
                "artifact version {} (expected {ARTIFACT_VERSION})",
                artifact.version
            )));
        }

        info!("model loaded from {}", path.as_ref().display());
        Ok(IntentClassifier {
            labels: artifact.labels,
            vectorizer: artifact.vectorizer,
            model: artifact.model,
        })
    }

    /// Load a persisted model if one exists, otherwise train from the
    /// dataset and persist the result.
    ///
    /// Idempotent: repeated calls never retrain unnecessarily. A corrupt
    /// artifact is recovered by retraining. Returns metrics only when a
    /// training run actually happened.
    pub fn load_or_train<P: AsRef<Path>, Q: AsRef<Path>>(
        model_path: P,
        dataset_path: Q,
        config: &TrainingConfig,
    ) -> Result<(Self, Option<TrainingMetrics>)> {
        let model_path = model_path.as_ref();
        if model_path.exists() {
            match Self::load(model_path) {
                Ok(classifier) => return Ok((classifier, None)),
                Err(e) => warn!("failed to load model, retraining: {e}"),
            }
        }

        let (classifier, metrics) = Self::train(dataset_path, config)?;
        classifier.save(model_path)?;
        Ok((classifier, Some(metrics)))
    }
}

/// Sorted unique labels from a set of examples.
fn collect_labels(examples: &[IntentExample]) -> Vec<String> {
    let mut labels: Vec<String> = examples.iter().map(|e| e.intent.clone()).collect();
    labels.sort();
    labels.dedup();
    labels
}

fn label_id(labels: &[String], label: &str) -> usize {
    labels
        .iter()
        .position(|l| l == label)
        .unwrap_or(usize::MAX)
}

/// Stratified seeded split; returns (train indices, test indices).
///
/// Every label keeps at least one training example, so a label present in
/// the dataset is always present in the fitted model.
fn stratified_split(
    examples: &[IntentExample],
    labels: &[String],
    config: &TrainingConfig,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(config.split_seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for label in labels {
        let mut indices: Vec<usize> = examples
            .iter()
            .enumerate()
            .filter(|(_, e)| &e.intent == label)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = ((indices.len() as f64) * config.test_fraction).floor() as usize;
        let n_test = n_test.min(indices.len().saturating_sub(1));

        test.extend(indices.drain(..n_test));
        train.extend(indices);
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, tempdir};

    use super::*;

    fn sample_dataset() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let rows = [
            ("i want to book a flight", "booking"),
            ("book me a flight to paris", "booking"),
            ("i need a plane ticket", "booking"),
            ("book a trip to rome", "booking"),
            ("reserve a flight for me", "booking"),
            ("what is the status of my booking", "status"),
            ("check my booking status", "status"),
            ("where is my reservation", "status"),
            ("has my booking been confirmed", "status"),
            ("track my booking reference", "status"),
            ("yes please", "confirmation"),
            ("yes go ahead", "confirmation"),
            ("confirm the booking", "confirmation"),
            ("sounds good proceed", "confirmation"),
            ("no thanks", "cancellation"),
            ("cancel that", "cancellation"),
            ("no i changed my mind", "cancellation"),
            ("stop the booking", "cancellation"),
        ];
        writeln!(file, "text,intent").unwrap();
        for (text, intent) in rows {
            writeln!(file, "{text},{intent}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_train_and_predict() {
        let dataset = sample_dataset();
        let config = TrainingConfig::default();
        let (classifier, metrics) = IntentClassifier::train(dataset.path(), &config).unwrap();

        assert!(metrics.accuracy >= 0.0 && metrics.accuracy <= 1.0);
        assert_eq!(classifier.labels().len(), 4);

        let result = classifier.predict("please book a flight to paris");
        assert_eq!(result.intent, "booking");
        assert!(result.confidence >= 0.40);
    }

    #[test]
    fn test_predict_returns_known_label_and_valid_distribution() {
        use rand::Rng;

        let dataset = sample_dataset();
        let config = TrainingConfig::default();
        let (classifier, _) = IntentClassifier::train(dataset.path(), &config).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let mut inputs = vec![String::new()];
        for _ in 0..100 {
            let words = rng.random_range(1..=8);
            let text = (0..words)
                .map(|_| {
                    let len = rng.random_range(1..=10);
                    (0..len)
                        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ");
            inputs.push(text);
        }

        for text in &inputs {
            let result = classifier.predict(text);
            assert!(classifier.labels().contains(&result.intent), "{text:?}");
            assert!((0.0..=1.0).contains(&result.confidence), "{text:?}");

            let sum: f64 = classifier.posterior(text).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{text:?}");
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dataset = sample_dataset();
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("model.bin");
        let config = TrainingConfig::default();

        let (classifier, _) = IntentClassifier::train(dataset.path(), &config).unwrap();
        classifier.save(&model_path).unwrap();
        let loaded = IntentClassifier::load(&model_path).unwrap();

        for text in ["book a flight", "check my status", "yes", "gibberish xyz"] {
            let a = classifier.predict(text);
            let b = loaded.predict(text);
            assert_eq!(a.intent, b.intent);
            assert!((a.confidence - b.confidence).abs() < 1e-12);
        }
    }

    #[test]
    fn test_load_or_train_is_idempotent() {
        let dataset = sample_dataset();
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("model.bin");
        let config = TrainingConfig::default();

        let (first, metrics) =
            IntentClassifier::load_or_train(&model_path, dataset.path(), &config).unwrap();
        assert!(metrics.is_some(), "first call must train");

        let (second, metrics) =
            IntentClassifier::load_or_train(&model_path, dataset.path(), &config).unwrap();
        assert!(metrics.is_none(), "second call must load, not retrain");

        let a = first.predict("book a flight to rome");
        let b = second.predict("book a flight to rome");
        assert_eq!(a.intent, b.intent);
        assert!((a.confidence - b.confidence).abs() < 1e-12);
    }

    #[test]
    fn test_corrupt_artifact_is_model_load_error() {
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("model.bin");
        fs::write(&model_path, b"definitely not a model").unwrap();

        let err = IntentClassifier::load(&model_path).unwrap_err();
        assert!(matches!(err, SkylarkError::ModelLoad(_)));

        // load_or_train recovers by retraining
        let dataset = sample_dataset();
        let config = TrainingConfig::default();
        let (_, metrics) =
            IntentClassifier::load_or_train(&model_path, dataset.path(), &config).unwrap();
        assert!(metrics.is_some());
    }

    #[test]
    fn test_single_label_dataset_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "text,intent").unwrap();
        writeln!(file, "book a flight,booking").unwrap();
        writeln!(file, "book another flight,booking").unwrap();
        file.flush().unwrap();

        let err = IntentClassifier::train(file.path(), &TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, SkylarkError::Dataset(_)));
    }
}
