//! Single-pass greedy average-linkage clustering over TF-IDF cosine similarity.
//!
//! Items are visited in input order. Each unassigned item seeds a cluster and
//! pulls in every later unassigned item whose mean similarity to the forming
//! cluster reaches the threshold. Clusters are never reopened or merged, so the
//! output depends on input order and is reproducible for a fixed order.

use recap_core::ActivityItem;
use serde::{Deserialize, Serialize};

use crate::error::{validate_threshold, ClusterError};
use crate::labeling::{thematic_label, top_keywords};
use crate::similarity::SimilarityMatrix;
use crate::tokenizer::Tokenizer;
use crate::vector::VectorModel;

pub const DEFAULT_THEME_THRESHOLD: f64 = 0.3;
pub const DEFAULT_TOP_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Public struct `ThematicOptions` used across recap components.
pub struct ThematicOptions {
    pub threshold: f64,
    pub top_keywords: usize,
}

impl Default for ThematicOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THEME_THRESHOLD,
            top_keywords: DEFAULT_TOP_KEYWORDS,
        }
    }
}

impl ThematicOptions {
    pub fn validate(&self) -> Result<(), ClusterError> {
        validate_threshold("theme threshold", self.threshold)?;
        if self.top_keywords == 0 {
            return Err(ClusterError::ZeroLimit {
                name: "top keywords",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A group of thematically similar items.
pub struct ThematicCluster {
    pub id: String,
    pub theme: String,
    /// Positions of the members in the clustered input.
    pub item_indices: Vec<usize>,
    pub members: Vec<ActivityItem>,
    pub keywords: Vec<String>,
    pub coherence: f64,
}

impl ThematicCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

pub fn cluster_thematic(
    items: &[ActivityItem],
    options: &ThematicOptions,
) -> Result<Vec<ThematicCluster>, ClusterError> {
    options.validate()?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let tokenizer = Tokenizer::thematic();
    let documents = items
        .iter()
        .map(|item| tokenizer.tokenize(&item.text()))
        .collect::<Vec<_>>();
    let (_, vectors) = VectorModel::build(&documents);
    let matrix = SimilarityMatrix::from_vectors(&vectors);

    let groups = greedy_average_linkage(&matrix, options.threshold);
    let clusters = groups
        .into_iter()
        .enumerate()
        .map(|(position, indices)| {
            let keywords = top_keywords(
                indices.iter().map(|index| documents[*index].as_slice()),
                options.top_keywords,
            );
            let theme = thematic_label(
                &keywords,
                indices.iter().map(|index| items[*index].source.as_str()),
            );
            ThematicCluster {
                id: format!("theme-{}", position + 1),
                theme,
                coherence: matrix.coherence(&indices),
                members: indices.iter().map(|index| items[*index].clone()).collect(),
                item_indices: indices,
                keywords,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        items = items.len(),
        clusters = clusters.len(),
        threshold = options.threshold,
        "thematic clustering complete"
    );
    Ok(clusters)
}

/// Partitions `0..matrix.len()` into groups in discovery order.
pub fn greedy_average_linkage(matrix: &SimilarityMatrix, threshold: f64) -> Vec<Vec<usize>> {
    let size = matrix.len();
    let mut assigned = vec![false; size];
    let mut groups = Vec::new();

    for seed in 0..size {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        for candidate in (seed + 1)..size {
            if assigned[candidate] {
                continue;
            }
            if matrix.average_against(candidate, &members) >= threshold {
                assigned[candidate] = true;
                members.push(candidate);
            }
        }
        groups.push(members);
    }

    groups
}
