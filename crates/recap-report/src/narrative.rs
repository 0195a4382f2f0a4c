//! Narrative text for a thematic report.
//!
//! A configured summarizer gets a prompt built from the clusters and their
//! connections. Any failure on that path, including a timeout or blank reply,
//! degrades to the deterministic narrative instead of surfacing an error.

use std::fmt::Write as _;
use std::time::Duration;

use recap_cluster::{CrossClusterConnection, ThematicCluster};

use crate::summarizer::Summarizer;

pub const EMPTY_NARRATIVE: &str = "No work items to summarize.";
pub const PROMPT_MEMBER_TITLES: usize = 3;

/// Deterministic narrative listing clusters in discovery order.
pub fn fallback_narrative(clusters: &[ThematicCluster]) -> String {
    match clusters {
        [] => EMPTY_NARRATIVE.to_string(),
        [only] => format!("Work focused on: {} ({} items)", only.theme, only.len()),
        _ => {
            let areas = clusters
                .iter()
                .map(|cluster| format!("{} ({} items)", cluster.theme, cluster.len()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Work spanned {} areas: {areas}", clusters.len())
        }
    }
}

pub fn build_summary_prompt(
    clusters: &[ThematicCluster],
    connections: &[CrossClusterConnection],
) -> String {
    let mut prompt = String::from("Summarize the following developer activity.\n\nClusters:\n");
    for (position, cluster) in clusters.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {} ({} items)",
            position + 1,
            cluster.theme,
            cluster.len()
        );
        if !cluster.keywords.is_empty() {
            let _ = writeln!(prompt, "   Keywords: {}", cluster.keywords.join(", "));
        }
        let _ = writeln!(prompt, "   Coherence: {:.2}", cluster.coherence);
        for member in cluster.members.iter().take(PROMPT_MEMBER_TITLES) {
            let _ = writeln!(prompt, "   - {}", member.title.trim());
        }
    }

    if !connections.is_empty() {
        prompt.push_str("\nConnections:\n");
        for connection in connections {
            let _ = writeln!(
                prompt,
                "- {} <-> {}: {}",
                connection.from_id, connection.to_id, connection.description
            );
        }
    }
    prompt
}

pub async fn synthesize_narrative(
    clusters: &[ThematicCluster],
    connections: &[CrossClusterConnection],
    summarizer: Option<&dyn Summarizer>,
    timeout: Duration,
) -> String {
    let Some(summarizer) = summarizer else {
        return fallback_narrative(clusters);
    };
    if clusters.is_empty() {
        return fallback_narrative(clusters);
    }

    let prompt = build_summary_prompt(clusters, connections);
    match tokio::time::timeout(timeout, summarizer.generate(&prompt)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(Ok(_)) => {
            tracing::warn!("summarizer returned empty content; using fallback narrative");
            fallback_narrative(clusters)
        }
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "summarizer failed; using fallback narrative");
            fallback_narrative(clusters)
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "summarizer timed out; using fallback narrative"
            );
            fallback_narrative(clusters)
        }
    }
}
