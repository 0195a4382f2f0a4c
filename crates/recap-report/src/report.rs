use std::time::Duration;

use recap_cluster::{
    cluster_thematic, detect_connections, ClusterError, CrossClusterConnection, ThematicCluster,
    ThematicOptions,
};
use recap_core::ActivityItem;
use serde::{Deserialize, Serialize};

use crate::narrative::synthesize_narrative;
use crate::summarizer::Summarizer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Thematic clusters with their narrative and keyword connections.
pub struct ThematicReport {
    pub clusters: Vec<ThematicCluster>,
    pub narrative: String,
    pub cross_cluster_connections: Vec<CrossClusterConnection>,
}

/// Clusters `items`, links overlapping clusters and writes the narrative.
///
/// Only option validation can fail; summarizer problems degrade to the
/// deterministic narrative.
pub async fn build_thematic_report(
    items: &[ActivityItem],
    options: &ThematicOptions,
    summarizer: Option<&dyn Summarizer>,
    summary_timeout: Duration,
) -> Result<ThematicReport, ClusterError> {
    let clusters = cluster_thematic(items, options)?;
    let cross_cluster_connections = detect_connections(&clusters);
    let narrative = synthesize_narrative(
        &clusters,
        &cross_cluster_connections,
        summarizer,
        summary_timeout,
    )
    .await;
    Ok(ThematicReport {
        clusters,
        narrative,
        cross_cluster_connections,
    })
}
