//! Report assembly for recap.
//!
//! Combines the clustering core with narrative synthesis, an LLM-backed
//! summarizer and a git-backed repository status provider.

pub mod git_status;
pub mod narrative;
pub mod report;
pub mod summarizer;

pub use git_status::{parse_porcelain_status, GitRepoStatusProvider, DEFAULT_GIT_TIMEOUT_MS};
pub use narrative::{build_summary_prompt, fallback_narrative, synthesize_narrative, EMPTY_NARRATIVE};
pub use recap_cluster::{build_feature_report, FeatureOptions, FeatureReport};
pub use report::{build_thematic_report, ThematicReport};
pub use summarizer::{LlmSummarizer, Summarizer, SummaryError};
