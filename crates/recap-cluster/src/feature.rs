//! Incremental keyword-overlap clustering used for progress reporting.
//!
//! Each item joins the existing cluster whose accumulated keyword set overlaps
//! its own keywords most, provided the overlap reaches the threshold; otherwise
//! it opens a new cluster. A cluster's keyword set is the union of its members'
//! keywords and only ever grows.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use recap_core::{ActivityItem, ItemContext};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{validate_threshold, ClusterError};
use crate::labeling::{feature_name, top_keywords};
use crate::similarity::overlap_similarity;
use crate::status::{
    infer_status, next_steps, FeatureStatus, RepoStatusCache, RepoStatusProvider,
};
use crate::tokenizer::Tokenizer;

pub const DEFAULT_FEATURE_THRESHOLD: f64 = 0.25;
pub const FEATURE_NAME_KEYWORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Public struct `FeatureOptions` used across recap components.
pub struct FeatureOptions {
    pub threshold: f64,
    /// Reference time for recency rules.
    pub now: DateTime<Utc>,
}

impl FeatureOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            threshold: DEFAULT_FEATURE_THRESHOLD,
            now,
        }
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        validate_threshold("feature threshold", self.threshold)
    }
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A named unit of ongoing work with inferred progress.
pub struct FeatureCluster {
    pub id: String,
    pub name: String,
    pub keywords: BTreeSet<String>,
    pub item_indices: Vec<usize>,
    pub members: Vec<ActivityItem>,
    pub status: FeatureStatus,
    pub completion_estimate: u8,
    pub last_activity: DateTime<Utc>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Public struct `FeatureReport` used across recap components.
pub struct FeatureReport {
    pub features: Vec<FeatureCluster>,
    pub uncategorized: Vec<ActivityItem>,
    pub active_feature_count: usize,
    pub completed_feature_count: usize,
}

#[derive(Debug, Clone)]
struct FeatureDraft {
    keywords: BTreeSet<String>,
    indices: Vec<usize>,
}

fn conventional_prefix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?i)^\s*(feat|feature|fix|bugfix|hotfix|chore|docs|style|refactor|perf|test|tests|build|ci|revert|wip)(\([^)]*\))?!?\s*:\s*",
            )
            .ok()
        })
        .as_ref()
}

fn bracket_tag_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\[[^\]]*\]").ok())
        .as_ref()
}

fn strip_bracket_tags(text: &str) -> String {
    match bracket_tag_pattern() {
        Some(pattern) => pattern.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    }
}

/// Removes a leading conventional-commit prefix and every `[tag]`.
pub fn strip_commit_noise(text: &str) -> String {
    let without_tags = strip_bracket_tags(text);
    let trimmed = without_tags.trim_start();
    match conventional_prefix_pattern() {
        Some(pattern) => pattern.replace(trimmed, "").into_owned(),
        None => trimmed.to_string(),
    }
}

/// Keyword tokens for one item after commit-noise stripping.
pub fn feature_tokens(tokenizer: &Tokenizer, item: &ActivityItem) -> Vec<String> {
    let mut text = strip_commit_noise(&item.title);
    if let Some(description) = item.description.as_deref() {
        text.push(' ');
        text.push_str(&strip_bracket_tags(description));
    }
    tokenizer.tokenize(&text)
}

/// Partitions item indices into drafts; also returns each item's tokens.
fn assign_to_drafts(
    items: &[ActivityItem],
    threshold: f64,
) -> (Vec<FeatureDraft>, Vec<Vec<String>>) {
    let tokenizer = Tokenizer::feature();
    let tokens = items
        .iter()
        .map(|item| feature_tokens(&tokenizer, item))
        .collect::<Vec<_>>();

    let mut drafts = Vec::<FeatureDraft>::new();
    for (index, item_tokens) in tokens.iter().enumerate() {
        let keywords = item_tokens.iter().cloned().collect::<BTreeSet<_>>();
        let mut best: Option<(usize, f64)> = None;
        for (position, draft) in drafts.iter().enumerate() {
            let overlap = overlap_similarity(&keywords, &draft.keywords);
            if best.map_or(true, |(_, best_overlap)| overlap > best_overlap) {
                best = Some((position, overlap));
            }
        }

        match best {
            Some((position, overlap)) if overlap >= threshold => {
                let draft = &mut drafts[position];
                draft.keywords.extend(keywords);
                draft.indices.push(index);
            }
            _ => drafts.push(FeatureDraft {
                keywords,
                indices: vec![index],
            }),
        }
    }

    (drafts, tokens)
}

pub fn build_feature_report(
    items: &[ActivityItem],
    options: &FeatureOptions,
    provider: &dyn RepoStatusProvider,
) -> Result<FeatureReport, ClusterError> {
    options.validate()?;
    if items.is_empty() {
        return Ok(FeatureReport::default());
    }

    let contexts = items
        .iter()
        .map(|item| ItemContext::from_metadata(&item.metadata))
        .collect::<Vec<_>>();
    let (drafts, tokens) = assign_to_drafts(items, options.threshold);
    let mut repo_cache = RepoStatusCache::new(provider);

    let mut report = FeatureReport::default();
    for draft in drafts {
        if draft.indices.len() == 1 && draft.keywords.len() < 2 {
            report
                .uncategorized
                .extend(draft.indices.iter().map(|index| items[*index].clone()));
            continue;
        }

        let members = draft
            .indices
            .iter()
            .map(|index| items[*index].clone())
            .collect::<Vec<_>>();
        let member_contexts = draft
            .indices
            .iter()
            .map(|index| &contexts[*index])
            .collect::<Vec<_>>();
        let repo = repo_cache.signal_for(&member_contexts);
        let (status, completion_estimate) = infer_status(&members, repo.as_ref(), options.now);
        let name_keywords = top_keywords(
            draft.indices.iter().map(|index| tokens[*index].as_slice()),
            FEATURE_NAME_KEYWORDS,
        );
        let last_activity = members
            .iter()
            .map(|item| item.timestamp)
            .max()
            .unwrap_or(options.now);

        report.features.push(FeatureCluster {
            id: format!("feature-{}", report.features.len() + 1),
            name: feature_name(&name_keywords),
            keywords: draft.keywords,
            item_indices: draft.indices,
            members,
            status,
            completion_estimate,
            last_activity,
            next_steps: next_steps(status, repo.as_ref()),
        });
    }

    report.active_feature_count = report
        .features
        .iter()
        .filter(|feature| feature.status.is_active())
        .count();
    report.completed_feature_count = report
        .features
        .iter()
        .filter(|feature| feature.status.is_completed())
        .count();

    tracing::debug!(
        items = items.len(),
        features = report.features.len(),
        uncategorized = report.uncategorized.len(),
        threshold = options.threshold,
        "feature clustering complete"
    );
    Ok(report)
}
