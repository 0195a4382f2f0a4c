use std::collections::BTreeSet;

use crate::vector::TermVector;

/// Cosine similarity clamped to `[0, 1]`; exactly 0 when either vector is zero.
pub fn cosine_similarity(left: &TermVector, right: &TermVector) -> f64 {
    if left.is_zero() || right.is_zero() {
        return 0.0;
    }
    let similarity = left.dot(right) / (left.magnitude() * right.magnitude());
    if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Jaccard overlap `|A ∩ B| / |A ∪ B|`; 0 when both sets are empty.
pub fn overlap_similarity(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    let shared = left.intersection(right).count();
    let union = left.len() + right.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

#[derive(Debug, Clone, PartialEq)]
/// Dense symmetric N×N cosine matrix with a unit diagonal.
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_vectors(vectors: &[TermVector]) -> Self {
        let size = vectors.len();
        let mut values = vec![0.0; size * size];
        for row in 0..size {
            values[row * size + row] = 1.0;
            for column in (row + 1)..size {
                let similarity = cosine_similarity(&vectors[row], &vectors[column]);
                values[row * size + column] = similarity;
                values[column * size + row] = similarity;
            }
        }
        Self { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.size + column]
    }

    /// Mean similarity of `candidate` against every index in `members`.
    pub fn average_against(&self, candidate: usize, members: &[usize]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        let total = members
            .iter()
            .map(|member| self.get(candidate, *member))
            .sum::<f64>();
        total / members.len() as f64
    }

    /// Mean pairwise similarity among `members`; 1.0 for fewer than two.
    pub fn coherence(&self, members: &[usize]) -> f64 {
        if members.len() < 2 {
            return 1.0;
        }
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (offset, left) in members.iter().enumerate() {
            for right in &members[offset + 1..] {
                total += self.get(*left, *right);
                pairs += 1;
            }
        }
        total / pairs as f64
    }
}
