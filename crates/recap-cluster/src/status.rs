//! Progress inference for feature clusters.
//!
//! The decision list is ordered; the first matching rule wins.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use recap_core::{is_within, ActivityItem, ItemContext};
use serde::{Deserialize, Serialize};

pub const RECENT_ACTIVITY_HOURS: i64 = 24;
pub const MAX_NEXT_STEPS: usize = 4;

pub const STEP_COMMIT_STAGED: &str = "Commit staged changes";
pub const STEP_STAGE_AND_COMMIT: &str = "Stage and commit pending changes";

const STARTED_STEPS: &[&str] = &[
    "Flesh out the core implementation",
    "Add tests covering the new behavior",
];
const IN_PROGRESS_STEPS: &[&str] = &[
    "Finish the remaining implementation work",
    "Add or update tests",
    "Review the changes for edge cases",
];
const NEARLY_DONE_STEPS: &[&str] = &[
    "Run the full test suite",
    "Update documentation",
    "Open a pull request for review",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
/// Enumerates supported `FeatureStatus` values.
pub enum FeatureStatus {
    Started,
    InProgress,
    NearlyDone,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureStatus::Started => "started",
            FeatureStatus::InProgress => "in-progress",
            FeatureStatus::NearlyDone => "nearly-done",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FeatureStatus::Started | FeatureStatus::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, FeatureStatus::NearlyDone)
    }

    fn canned_steps(&self) -> &'static [&'static str] {
        match self {
            FeatureStatus::Started => STARTED_STEPS,
            FeatureStatus::InProgress => IN_PROGRESS_STEPS,
            FeatureStatus::NearlyDone => NEARLY_DONE_STEPS,
        }
    }
}

impl std::fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Working-tree state of one repository.
pub struct RepoStatus {
    pub staged: bool,
    pub unstaged: bool,
    pub ahead: u32,
}

impl RepoStatus {
    pub fn has_uncommitted_changes(&self) -> bool {
        self.staged || self.unstaged
    }
}

/// Looks up the current state of a repository. `None` means no status is available.
pub trait RepoStatusProvider: Send + Sync {
    fn status(&self, repo: &Path) -> Option<RepoStatus>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Provider that never knows anything; status falls back to collector hints.
pub struct NoRepoStatus;

impl RepoStatusProvider for NoRepoStatus {
    fn status(&self, _repo: &Path) -> Option<RepoStatus> {
        None
    }
}

/// Memoizes provider lookups so each repository is queried once per run.
pub(crate) struct RepoStatusCache<'a> {
    provider: &'a dyn RepoStatusProvider,
    cache: HashMap<PathBuf, Option<RepoStatus>>,
}

impl<'a> RepoStatusCache<'a> {
    pub(crate) fn new(provider: &'a dyn RepoStatusProvider) -> Self {
        Self {
            provider,
            cache: HashMap::new(),
        }
    }

    fn lookup(&mut self, repo: &Path) -> Option<RepoStatus> {
        if let Some(cached) = self.cache.get(repo) {
            return *cached;
        }
        let status = self.provider.status(repo);
        if status.is_none() {
            tracing::debug!(repo = %repo.display(), "repo status unavailable; using collector hints");
        }
        self.cache.insert(repo.to_path_buf(), status);
        status
    }

    /// Combined repository signal for a set of cluster members.
    ///
    /// Each distinct repo contributes its provider status, or the collector
    /// hints recorded on its items when the lookup fails. Items without a repo
    /// path contribute their hints as one anonymous repository.
    pub(crate) fn signal_for(&mut self, contexts: &[&ItemContext]) -> Option<RepoStatus> {
        let mut hints = BTreeMap::<Option<PathBuf>, Option<RepoStatus>>::new();
        for context in contexts {
            let key = context.repo.path.clone();
            let hinted = hint_status(context);
            let slot = hints.entry(key).or_insert(None);
            *slot = merge_hint(*slot, hinted);
        }

        let mut combined: Option<RepoStatus> = None;
        for (path, hinted) in hints {
            let resolved = match path.as_deref() {
                Some(path) => self.lookup(path).or(hinted),
                None => hinted,
            };
            if let Some(status) = resolved {
                let total = combined.get_or_insert_with(RepoStatus::default);
                total.staged |= status.staged;
                total.unstaged |= status.unstaged;
                total.ahead = total.ahead.saturating_add(status.ahead);
            }
        }
        combined
    }
}

fn hint_status(context: &ItemContext) -> Option<RepoStatus> {
    if context.repo.dirty.is_none() && context.repo.ahead.is_none() {
        return None;
    }
    Some(RepoStatus {
        staged: false,
        unstaged: context.repo.dirty.unwrap_or(false),
        ahead: context.repo.ahead.unwrap_or(0),
    })
}

fn merge_hint(current: Option<RepoStatus>, next: Option<RepoStatus>) -> Option<RepoStatus> {
    match (current, next) {
        (Some(current), Some(next)) => Some(RepoStatus {
            staged: current.staged || next.staged,
            unstaged: current.unstaged || next.unstaged,
            ahead: current.ahead.max(next.ahead),
        }),
        (current, next) => current.or(next),
    }
}

/// Status and completion estimate for a cluster's members.
pub fn infer_status(
    members: &[ActivityItem],
    repo: Option<&RepoStatus>,
    now: DateTime<Utc>,
) -> (FeatureStatus, u8) {
    if repo.is_some_and(RepoStatus::has_uncommitted_changes) {
        return (FeatureStatus::InProgress, 50);
    }
    let member_count = members.len();
    let window = Duration::hours(RECENT_ACTIVITY_HOURS);
    let has_recent = members
        .iter()
        .any(|item| is_within(item.timestamp, now, window));
    if member_count > 3 && !has_recent {
        return (FeatureStatus::NearlyDone, 85);
    }
    if member_count <= 2 {
        return (FeatureStatus::Started, 15);
    }
    if member_count <= 5 {
        return (FeatureStatus::InProgress, 45);
    }
    (FeatureStatus::NearlyDone, 75)
}

/// Canned steps for `status`, with repo actions prepended/appended, capped at four.
pub fn next_steps(status: FeatureStatus, repo: Option<&RepoStatus>) -> Vec<String> {
    let mut steps = status
        .canned_steps()
        .iter()
        .map(|step| step.to_string())
        .collect::<Vec<_>>();

    if let Some(repo) = repo {
        if repo.unstaged {
            steps.insert(0, STEP_STAGE_AND_COMMIT.to_string());
        } else if repo.staged {
            steps.insert(0, STEP_COMMIT_STAGED.to_string());
        }
        if repo.ahead > 0 {
            steps.push(format!("Push {} commit(s) to remote", repo.ahead));
        }
    }

    steps.truncate(MAX_NEXT_STEPS);
    steps
}
