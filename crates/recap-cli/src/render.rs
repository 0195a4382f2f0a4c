use std::fmt::Write as _;

use recap_cluster::FeatureReport;
use recap_report::ThematicReport;

use crate::RecapOutput;

pub(crate) fn render_text(output: &RecapOutput) -> String {
    let mut text = String::new();
    if let Some(period) = output.period.as_ref() {
        let _ = writeln!(
            text,
            "Period: {} to {}\n",
            period.start.to_rfc3339(),
            period.end.to_rfc3339()
        );
    }
    if let Some(thematic) = output.thematic.as_ref() {
        render_thematic(&mut text, thematic);
    }
    if let Some(features) = output.features.as_ref() {
        if output.thematic.is_some() {
            text.push('\n');
        }
        render_features(&mut text, features);
    }
    text
}

fn render_thematic(text: &mut String, report: &ThematicReport) {
    let _ = writeln!(text, "Themes\n{}\n", report.narrative);
    for cluster in &report.clusters {
        let _ = writeln!(
            text,
            "[{}] {} ({} items, coherence {:.2})",
            cluster.id,
            cluster.theme,
            cluster.len(),
            cluster.coherence
        );
        if !cluster.keywords.is_empty() {
            let _ = writeln!(text, "  keywords: {}", cluster.keywords.join(", "));
        }
        for member in &cluster.members {
            let _ = writeln!(text, "  - {}", member.title);
        }
    }
    if !report.cross_cluster_connections.is_empty() {
        text.push_str("\nConnections\n");
        for connection in &report.cross_cluster_connections {
            let _ = writeln!(
                text,
                "  {} <-> {}: {}",
                connection.from_id, connection.to_id, connection.description
            );
        }
    }
}

fn render_features(text: &mut String, report: &FeatureReport) {
    let _ = writeln!(
        text,
        "Features (active {}, completed {})",
        report.active_feature_count, report.completed_feature_count
    );
    for feature in &report.features {
        let _ = writeln!(
            text,
            "[{}] {}: {} ({}%)",
            feature.id, feature.name, feature.status, feature.completion_estimate
        );
        let _ = writeln!(
            text,
            "  {} items, last activity {}",
            feature.members.len(),
            feature.last_activity.to_rfc3339()
        );
        for step in &feature.next_steps {
            let _ = writeln!(text, "  next: {step}");
        }
    }
    if !report.uncategorized.is_empty() {
        let _ = writeln!(text, "Uncategorized ({} items)", report.uncategorized.len());
        for item in &report.uncategorized {
            let _ = writeln!(text, "  - {}", item.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use recap_cluster::{FeatureReport, ThematicCluster};
    use recap_core::ActivityItem;
    use recap_report::ThematicReport;

    use super::render_text;
    use crate::RecapOutput;

    #[test]
    fn functional_text_lists_narrative_themes_and_uncategorized() {
        let timestamp = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let output = RecapOutput {
            period: None,
            item_count: 2,
            thematic: Some(ThematicReport {
                clusters: vec![ThematicCluster {
                    id: "theme-1".to_string(),
                    theme: "Login & Form".to_string(),
                    item_indices: vec![0],
                    members: vec![ActivityItem::new("git", timestamp, "feat: login form")],
                    keywords: vec!["login".to_string(), "form".to_string()],
                    coherence: 1.0,
                }],
                narrative: "Work focused on: Login & Form (1 items)".to_string(),
                cross_cluster_connections: Vec::new(),
            }),
            features: Some(FeatureReport {
                uncategorized: vec![ActivityItem::new("git", timestamp, "wip")],
                ..FeatureReport::default()
            }),
        };

        let text = render_text(&output);
        assert!(text.contains("Work focused on: Login & Form (1 items)"));
        assert!(text.contains("[theme-1] Login & Form (1 items, coherence 1.00)"));
        assert!(text.contains("keywords: login, form"));
        assert!(text.contains("Features (active 0, completed 0)"));
        assert!(text.contains("Uncategorized (1 items)"));
        assert!(text.contains("  - wip"));
    }
}
