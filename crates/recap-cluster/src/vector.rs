//! TF-IDF vector model.
//!
//! Term frequency is max-normalized (`count / max_count` within a document) and
//! inverse document frequency is smoothed as `ln(N / df) + 1`, so every known
//! term weighs at least its term frequency. With a single-document corpus every
//! IDF is exactly 1.
//!
//! Weights live in `BTreeMap`s so dot products sum in key order and repeated
//! runs produce bit-identical similarities.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
/// Sparse TF-IDF weights for one document plus their L2 norm.
pub struct TermVector {
    weights: BTreeMap<String, f64>,
    magnitude: f64,
}

impl TermVector {
    pub fn from_weights(weights: BTreeMap<String, f64>) -> Self {
        let magnitude = weights
            .values()
            .map(|weight| weight * weight)
            .sum::<f64>()
            .sqrt();
        Self { weights, magnitude }
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.0
    }

    /// Dot product over the shared terms.
    ///
    /// Shared terms are visited in key order whichever side drives the scan,
    /// so `a.dot(b)` and `b.dot(a)` are bit-identical.
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (smaller, larger) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };
        smaller
            .iter()
            .filter_map(|(term, weight)| larger.get(term).map(|shared| weight * shared))
            .sum()
    }
}

/// Max-normalized term frequencies for one token sequence.
pub fn term_frequencies(tokens: &[String]) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::<String, usize>::new();
    for token in tokens {
        *counts.entry(token.clone()).or_default() += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    if max_count == 0 {
        return BTreeMap::new();
    }
    counts
        .into_iter()
        .map(|(term, count)| (term, count as f64 / max_count as f64))
        .collect()
}

#[derive(Debug, Clone, Default)]
/// Corpus statistics needed to weight documents.
pub struct VectorModel {
    document_count: usize,
    document_frequency: BTreeMap<String, usize>,
}

impl VectorModel {
    pub fn fit(documents: &[Vec<String>]) -> Self {
        let mut document_frequency = BTreeMap::<String, usize>::new();
        for document in documents {
            let unique_terms = document.iter().collect::<BTreeSet<_>>();
            for term in unique_terms {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
        }
        Self {
            document_count: documents.len(),
            document_frequency,
        }
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// `ln(N / df) + 1`, or `None` for a term the corpus never saw.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let frequency = self.document_frequency(term);
        if frequency == 0 || self.document_count == 0 {
            return None;
        }
        Some((self.document_count as f64 / frequency as f64).ln() + 1.0)
    }

    pub fn vectorize(&self, tokens: &[String]) -> TermVector {
        let weights = term_frequencies(tokens)
            .into_iter()
            .filter_map(|(term, tf)| self.idf(&term).map(|idf| (term, tf * idf)))
            .collect();
        TermVector::from_weights(weights)
    }

    /// Fits the corpus and returns one vector per document, in input order.
    pub fn build(documents: &[Vec<String>]) -> (Self, Vec<TermVector>) {
        let model = Self::fit(documents);
        let vectors = documents
            .iter()
            .map(|document| model.vectorize(document))
            .collect();
        (model, vectors)
    }
}
