//! Multinomial naive Bayes over TF-IDF features.
//!
//! A generative model: per-class priors plus class-conditional feature
//! likelihoods estimated from (fractional) feature counts with additive
//! smoothing. Posteriors are computed in log space and normalized back to a
//! probability simplex with log-sum-exp, so confidences across all classes
//! always sum to 1.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkylarkError};

/// Multinomial naive Bayes model.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Log prior per class.
    class_log_prior: Vec<f64>,
    /// Smoothed log likelihood per class and feature dimension.
    feature_log_prob: Vec<Vec<f64>>,
    /// Number of feature dimensions.
    n_features: usize,
}

impl MultinomialNb {
    /// Fit the model from feature vectors and class ids in `0..n_classes`.
    ///
    /// `alpha` is the additive smoothing strength; it must be positive so no
    /// likelihood term can become zero.
    pub fn fit(
        vectors: &[Vec<f64>],
        classes: &[usize],
        n_classes: usize,
        alpha: f64,
    ) -> Result<Self> {
        if vectors.is_empty() || vectors.len() != classes.len() {
            return Err(SkylarkError::dataset(
                "feature vectors and class labels must be non-empty and aligned",
            ));
        }
        if alpha <= 0.0 {
            return Err(SkylarkError::invalid_operation(
                "smoothing alpha must be positive",
            ));
        }

        let n_features = vectors[0].len();
        let mut class_counts = vec![0usize; n_classes];
        let mut feature_counts = vec![vec![0.0f64; n_features]; n_classes];

        for (vector, &class) in vectors.iter().zip(classes) {
            if class >= n_classes {
                return Err(SkylarkError::dataset(format!(
                    "class id {class} out of range (n_classes = {n_classes})"
                )));
            }
            class_counts[class] += 1;
            for (j, &value) in vector.iter().enumerate() {
                feature_counts[class][j] += value;
            }
        }

        let n_samples = vectors.len() as f64;
        let class_log_prior = class_counts
            .iter()
            .map(|&count| ((count as f64).max(f64::MIN_POSITIVE) / n_samples).ln())
            .collect();

        let feature_log_prob = feature_counts
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts
                    .iter()
                    .map(|&count| ((count + alpha) / total).ln())
                    .collect()
            })
            .collect();

        Ok(MultinomialNb {
            class_log_prior,
            feature_log_prob,
            n_features,
        })
    }

    /// Compute the posterior probability of each class for a feature vector.
    ///
    /// The result is a probability distribution: every entry lies in [0, 1]
    /// and the entries sum to 1. A zero vector yields the class priors.
    pub fn predict_proba(&self, vector: &[f64]) -> Vec<f64> {
        let mut joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .enumerate()
            .map(|(class, &prior)| {
                let likelihood: f64 = vector
                    .iter()
                    .take(self.n_features)
                    .enumerate()
                    .map(|(j, &value)| value * self.feature_log_prob[class][j])
                    .sum();
                prior + likelihood
            })
            .collect();

        // Normalize in log space via log-sum-exp.
        let max = joint.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = joint.iter().map(|&score| (score - max).exp()).sum::<f64>().ln() + max;
        for score in &mut joint {
            *score = (*score - log_sum).exp();
        }

        joint
    }

    /// The arg-max class and its posterior probability.
    pub fn predict(&self, vector: &[f64]) -> (usize, f64) {
        let proba = self.predict_proba(vector);
        proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(class, &p)| (class, p))
            .unwrap_or((0, 0.0))
    }

    /// Number of classes the model was fitted on.
    pub fn n_classes(&self) -> usize {
        self.class_log_prior.len()
    }

    /// Number of feature dimensions the model was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
