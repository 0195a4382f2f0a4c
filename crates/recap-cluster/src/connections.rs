use serde::{Deserialize, Serialize};

use crate::thematic::ThematicCluster;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Keyword overlap between two thematic clusters.
pub struct CrossClusterConnection {
    pub from_id: String,
    pub to_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_keywords: Vec<String>,
}

/// One connection per unordered cluster pair that shares at least one keyword.
///
/// Shared keywords keep the order of the earlier cluster's keyword list.
pub fn detect_connections(clusters: &[ThematicCluster]) -> Vec<CrossClusterConnection> {
    let mut connections = Vec::new();
    for (offset, from) in clusters.iter().enumerate() {
        for to in &clusters[offset + 1..] {
            let shared = from
                .keywords
                .iter()
                .filter(|keyword| to.keywords.contains(keyword))
                .cloned()
                .collect::<Vec<_>>();
            if shared.is_empty() {
                continue;
            }
            connections.push(CrossClusterConnection {
                from_id: from.id.clone(),
                to_id: to.id.clone(),
                description: format!("Shared focus: {}", shared.join(", ")),
                shared_keywords: shared,
            });
        }
    }
    connections
}
