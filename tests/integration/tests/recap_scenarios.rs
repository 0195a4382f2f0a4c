use std::{
    collections::VecDeque,
    path::Path,
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use recap_ai::{ChatRequest, ChatResponse, ChatUsage, LlmClient, Message, RecapAiError};
use recap_cluster::{
    build_feature_report, cluster_thematic, FeatureOptions, FeatureStatus, NoRepoStatus,
    RepoStatus, RepoStatusProvider, ThematicOptions,
};
use recap_core::ActivityItem;
use recap_report::{
    build_thematic_report, fallback_narrative, GitRepoStatusProvider, LlmSummarizer,
    Summarizer, EMPTY_NARRATIVE,
};
use serde_json::json;
use tokio::sync::Mutex as AsyncMutex;

struct ScriptedClient {
    responses: AsyncMutex<VecDeque<ChatResponse>>,
    requests: AsyncMutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: AsyncMutex::new(VecDeque::from(responses)),
            requests: AsyncMutex::new(Vec::new()),
            delay: None,
        }
    }

    fn slow(responses: Vec<ChatResponse>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(responses)
        }
    }

    async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RecapAiError> {
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .ok_or_else(|| RecapAiError::InvalidResponse("scripted response queue exhausted".into()))
    }
}

struct FixedRepoStatus(RepoStatus);

impl RepoStatusProvider for FixedRepoStatus {
    fn status(&self, _repo: &Path) -> Option<RepoStatus> {
        Some(self.0)
    }
}

fn reply(text: &str) -> ChatResponse {
    ChatResponse {
        message: Message::assistant_text(text),
        finish_reason: Some("stop".to_string()),
        usage: ChatUsage::default(),
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 14, 17, 0, 0).unwrap()
}

fn items_at(titles: &[&str], newest: DateTime<Utc>) -> Vec<ActivityItem> {
    titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            ActivityItem::new("git", newest - ChronoDuration::minutes(index as i64 * 10), *title)
        })
        .collect()
}

fn login_items() -> Vec<ActivityItem> {
    items_at(
        &[
            "feat: add login form",
            "feat: add login validation",
            "chore: update CI config",
        ],
        now() - ChronoDuration::hours(1),
    )
}

fn auth_items() -> Vec<ActivityItem> {
    items_at(
        &[
            "auth session cookie rotation",
            "auth session cookie expiry",
            "auth session cookie signing",
            "auth session cookie logout",
            "auth session cookie domain",
            "auth session cookie tests",
        ],
        now() - ChronoDuration::hours(2),
    )
}

#[test]
fn integration_login_items_merge_and_ci_item_is_singleton() {
    let clusters = cluster_thematic(&login_items(), &ThematicOptions::default()).expect("cluster");
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].item_indices, vec![0, 1]);
    assert_eq!(clusters[1].item_indices, vec![2]);
    assert_eq!(clusters[1].coherence, 1.0);
}

#[test]
fn integration_dirty_repo_marks_auth_feature_in_progress() {
    let items = auth_items()
        .into_iter()
        .map(|item| item.with_metadata("repo", json!("/work/auth-service")))
        .collect::<Vec<_>>();
    let provider = FixedRepoStatus(RepoStatus {
        staged: true,
        unstaged: true,
        ahead: 2,
    });
    let report =
        build_feature_report(&items, &FeatureOptions::at(now()), &provider).expect("features");

    assert_eq!(report.features.len(), 1);
    let feature = &report.features[0];
    assert_eq!(feature.status, FeatureStatus::InProgress);
    assert_eq!(feature.completion_estimate, 50);
    assert_eq!(feature.next_steps[0], "Stage and commit pending changes");
    assert_eq!(feature.next_steps.len(), 4);
    assert!(feature.keywords.contains("auth"));
}

#[test]
fn integration_collector_dirty_hint_applies_when_git_lookup_fails() {
    let items = auth_items()
        .into_iter()
        .map(|item| {
            item.with_metadata("repo", json!("/nonexistent/recap-fixture-repo"))
                .with_metadata("dirty", json!(true))
        })
        .collect::<Vec<_>>();
    let report = build_feature_report(
        &items,
        &FeatureOptions::at(now()),
        &GitRepoStatusProvider::new(),
    )
    .expect("features");

    assert_eq!(report.features[0].status, FeatureStatus::InProgress);
    assert_eq!(report.features[0].completion_estimate, 50);
    assert_eq!(
        report.features[0].next_steps[0],
        "Stage and commit pending changes"
    );
}

#[test]
fn integration_old_refactor_items_on_clean_repo_are_nearly_done() {
    let items = items_at(
        &[
            "refactor: config loader parsing",
            "refactor: config loader defaults",
            "refactor: config loader errors",
            "refactor: config loader validation",
        ],
        now() - ChronoDuration::hours(30),
    )
    .into_iter()
    .map(|item| item.with_metadata("repo", json!("/work/app")))
    .collect::<Vec<_>>();
    let report = build_feature_report(
        &items,
        &FeatureOptions::at(now()),
        &FixedRepoStatus(RepoStatus::default()),
    )
    .expect("features");

    assert_eq!(report.features.len(), 1);
    assert_eq!(report.features[0].status, FeatureStatus::NearlyDone);
    assert_eq!(report.features[0].completion_estimate, 85);
    assert_eq!(report.completed_feature_count, 1);
    assert_eq!(report.active_feature_count, 0);
}

#[tokio::test]
async fn integration_empty_input_yields_empty_reports() {
    let thematic = build_thematic_report(
        &[],
        &ThematicOptions::default(),
        None,
        Duration::from_secs(1),
    )
    .await
    .expect("thematic");
    assert!(thematic.clusters.is_empty());
    assert_eq!(thematic.narrative, EMPTY_NARRATIVE);

    let features =
        build_feature_report(&[], &FeatureOptions::at(now()), &NoRepoStatus).expect("features");
    assert!(features.features.is_empty());
    assert!(features.uncategorized.is_empty());
    assert_eq!(features.active_feature_count, 0);
    assert_eq!(features.completed_feature_count, 0);

    let json = serde_json::to_value(&thematic).expect("serialize");
    assert_eq!(json["clusters"], json!([]));
    assert_eq!(json["narrative"], "No work items to summarize.");
}

#[test]
fn integration_single_item_is_unit_coherence_singleton() {
    let items = items_at(&["x"], now());
    let clusters = cluster_thematic(&items, &ThematicOptions::default()).expect("cluster");
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].coherence, 1.0);
}

#[tokio::test]
async fn integration_shared_auth_keyword_links_two_themes() {
    let items = items_at(
        &[
            "login form auth",
            "login form screen",
            "deploy pipeline auth secrets",
            "deploy pipeline secrets rotation",
        ],
        now(),
    );
    let report = build_thematic_report(
        &items,
        &ThematicOptions::default(),
        None,
        Duration::from_secs(1),
    )
    .await
    .expect("thematic");

    assert_eq!(report.clusters.len(), 2);
    assert_eq!(report.cross_cluster_connections.len(), 1);
    let connection = &report.cross_cluster_connections[0];
    assert_eq!(connection.from_id, "theme-1");
    assert_eq!(connection.to_id, "theme-2");
    assert!(connection.description.contains("auth"));
}

#[tokio::test]
async fn integration_llm_summarizer_replaces_narrative_and_sees_clusters() {
    let client = Arc::new(ScriptedClient::new(vec![reply(
        "Most effort went into the login form.",
    )]));
    let summarizer = LlmSummarizer::new(client.clone(), "gpt-4o-mini");
    let report = build_thematic_report(
        &login_items(),
        &ThematicOptions::default(),
        Some(&summarizer as &dyn Summarizer),
        Duration::from_secs(5),
    )
    .await
    .expect("thematic");

    assert_eq!(report.narrative, "Most effort went into the login form.");
    assert_eq!(client.request_count().await, 1);
    let requests = client.requests.lock().await;
    let prompt = requests[0].messages[1].text_content();
    assert!(prompt.contains("Login & Form (2 items)"));
    assert!(prompt.contains("feat: add login validation"));
}

#[tokio::test]
async fn regression_summarizer_error_empty_reply_and_timeout_all_fall_back() {
    let items = login_items();
    let expected = fallback_narrative(
        &cluster_thematic(&items, &ThematicOptions::default()).expect("cluster"),
    );

    let failing = LlmSummarizer::new(Arc::new(ScriptedClient::new(Vec::new())), "model");
    let empty = LlmSummarizer::new(Arc::new(ScriptedClient::new(vec![reply("  ")])), "model");
    let slow = LlmSummarizer::new(
        Arc::new(ScriptedClient::slow(
            vec![reply("too late")],
            Duration::from_secs(30),
        )),
        "model",
    );

    for summarizer in [&failing, &empty, &slow] {
        let report = build_thematic_report(
            &items,
            &ThematicOptions::default(),
            Some(summarizer as &dyn Summarizer),
            Duration::from_millis(50),
        )
        .await
        .expect("thematic");
        assert_eq!(report.narrative, expected);
    }
}

#[test]
fn regression_repeated_runs_are_identical_for_both_algorithms() {
    let mut items = login_items();
    items.extend(auth_items());
    let options = ThematicOptions::default();
    assert_eq!(
        cluster_thematic(&items, &options).expect("cluster"),
        cluster_thematic(&items, &options).expect("cluster")
    );
    let feature_options = FeatureOptions::at(now());
    assert_eq!(
        build_feature_report(&items, &feature_options, &NoRepoStatus).expect("features"),
        build_feature_report(&items, &feature_options, &NoRepoStatus).expect("features")
    );
}
