//! Evaluation metrics computed on the held-out split during training.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metrics from one training run, computed on the held-out split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Fraction of held-out examples classified correctly.
    pub accuracy: f64,
    /// Label set in confusion-matrix row/column order.
    pub labels: Vec<String>,
    /// Precision per label.
    pub precision: HashMap<String, f64>,
    /// Recall per label.
    pub recall: HashMap<String, f64>,
    /// Confusion matrix; rows are actual labels, columns predicted.
    pub confusion: Vec<Vec<usize>>,
    /// Number of training examples.
    pub n_train: usize,
    /// Number of held-out examples.
    pub n_test: usize,
}

impl TrainingMetrics {
    /// Compute metrics from aligned actual/predicted class id slices.
    pub fn compute(
        actual: &[usize],
        predicted: &[usize],
        labels: &[String],
        n_train: usize,
    ) -> Self {
        let n = labels.len();
        let mut confusion = vec![vec![0usize; n]; n];
        let mut correct = 0usize;

        for (&a, &p) in actual.iter().zip(predicted) {
            confusion[a][p] += 1;
            if a == p {
                correct += 1;
            }
        }

        let mut precision = HashMap::new();
        let mut recall = HashMap::new();
        for (idx, label) in labels.iter().enumerate() {
            let true_positive = confusion[idx][idx];
            let predicted_positive: usize = (0..n).map(|row| confusion[row][idx]).sum();
            let actual_positive: usize = confusion[idx].iter().sum();

            precision.insert(
                label.clone(),
                if predicted_positive > 0 {
                    true_positive as f64 / predicted_positive as f64
                } else {
                    0.0
                },
            );
            recall.insert(
                label.clone(),
                if actual_positive > 0 {
                    true_positive as f64 / actual_positive as f64
                } else {
                    0.0
                },
            );
        }

        let accuracy = if actual.is_empty() {
            0.0
        } else {
            correct as f64 / actual.len() as f64
        };

        TrainingMetrics {
            accuracy,
            labels: labels.to_vec(),
            precision,
            recall,
            confusion,
            n_train,
            n_test: actual.len(),
        }
    }
}

impl fmt::Display for TrainingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "accuracy: {:.3} ({} train / {} test)",
            self.accuracy, self.n_train, self.n_test
        )?;
        for label in &self.labels {
            writeln!(
                f,
                "  {:<16} precision {:.3}  recall {:.3}",
                label,
                self.precision.get(label).copied().unwrap_or(0.0),
                self.recall.get(label).copied().unwrap_or(0.0),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_perfect() {
        let labels = vec!["booking".to_string(), "greeting".to_string()];
        let metrics = TrainingMetrics::compute(&[0, 1, 0], &[0, 1, 0], &labels, 10);

        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision["booking"], 1.0);
        assert_eq!(metrics.recall["greeting"], 1.0);
        assert_eq!(metrics.n_test, 3);
    }

    #[test]
    fn test_metrics_confusion_rows_match_counts() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let metrics = TrainingMetrics::compute(&[0, 0, 1, 1], &[0, 1, 1, 1], &labels, 0);

        // Row sums equal per-label actual counts
        assert_eq!(metrics.confusion[0].iter().sum::<usize>(), 2);
        assert_eq!(metrics.confusion[1].iter().sum::<usize>(), 2);
        assert_eq!(metrics.accuracy, 0.75);
        assert_eq!(metrics.recall["a"], 0.5);
        assert!((metrics.precision["b"] - 2.0 / 3.0).abs() < 1e-9);
    }
}
