//! TF-IDF vectorizer for text feature extraction.
//!
//! The vectorizer is fitted once, at training time, from the observed
//! unigrams and bigrams of the training corpus. Inference reuses the fitted
//! vocabulary and IDF weighting without refitting; n-grams outside the
//! vocabulary are silently dropped.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::ChatAnalyzer;
use crate::error::{Result, SkylarkError};

/// TF-IDF vectorizer producing fixed-length feature vectors.
#[derive(Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Vocabulary: n-gram -> dimension index mapping.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency for each dimension.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    /// Minimum document frequency for an n-gram to be kept.
    min_df: usize,
    /// Maximum document-frequency fraction before an n-gram is pruned.
    max_df: f64,
    /// Analyzer for tokenization. Deterministic, so it is rebuilt rather
    /// than serialized.
    #[serde(skip, default)]
    analyzer: ChatAnalyzer,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new unfitted TF-IDF vectorizer.
    pub fn new() -> Self {
        Self::with_df_bounds(1, 1.0)
    }

    /// Create a vectorizer with document-frequency pruning bounds.
    pub fn with_df_bounds(min_df: usize, max_df: f64) -> Self {
        TfIdfVectorizer {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            min_df,
            max_df,
            analyzer: ChatAnalyzer::default(),
        }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Builds the vocabulary from observed unigrams and bigrams, prunes by
    /// document frequency and computes the IDF weighting. Fitting replaces
    /// any previous state.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(SkylarkError::dataset("cannot fit vectorizer on empty corpus"));
        }

        self.n_documents = documents.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let ngrams = self.ngrams(doc)?;
            let unique: HashSet<_> = ngrams.into_iter().collect();
            for ngram in unique {
                *document_frequency.entry(ngram).or_insert(0) += 1;
            }
        }

        let max_count = (self.max_df * self.n_documents as f64).ceil() as usize;

        // Deterministic dimension order: sort surviving n-grams.
        let mut kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && *df <= max_count)
            .collect();
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (ngram, df)) in kept.into_iter().enumerate() {
            // IDF = log((N + 1) / (df + 1)) + 1
            idf.push(((self.n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(ngram, idx);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;

        Ok(())
    }

    /// Transform a document into a TF-IDF feature vector.
    ///
    /// Unknown n-grams contribute nothing; an entirely out-of-vocabulary
    /// document yields the zero vector, never an error.
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        let ngrams = self.ngrams(document)?;
        let mut tf = vec![0.0; self.vocabulary.len()];

        for ngram in &ngrams {
            if let Some(&idx) = self.vocabulary.get(ngram) {
                tf[idx] += 1.0;
            }
        }

        // Normalize by document length
        let doc_length = ngrams.len() as f64;
        if doc_length > 0.0 {
            for count in &mut tf {
                *count /= doc_length;
            }
        }

        // Apply IDF
        for (idx, count) in tf.iter_mut().enumerate() {
            *count *= self.idf[idx];
        }

        Ok(tf)
    }

    /// Generate unigrams and bigrams from the analyzed token stream.
    fn ngrams(&self, text: &str) -> Result<Vec<String>> {
        let terms = self.analyzer.terms(text)?;
        let mut ngrams = terms.clone();
        for pair in terms.windows(2) {
            ngrams.push(format!("{} {}", pair[0], pair[1]));
        }
        Ok(ngrams)
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Get the number of documents seen during fitting.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
