use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use recap_cluster::{DEFAULT_FEATURE_THRESHOLD, DEFAULT_THEME_THRESHOLD};
use recap_report::DEFAULT_GIT_TIMEOUT_MS;

pub(crate) const DEFAULT_SUMMARY_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CliMode {
    Thematic,
    Features,
    All,
}

impl CliMode {
    pub(crate) fn includes_thematic(self) -> bool {
        matches!(self, CliMode::Thematic | CliMode::All)
    }

    pub(crate) fn includes_features(self) -> bool {
        matches!(self, CliMode::Features | CliMode::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CliFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CliSummarizer {
    None,
    Openai,
    Anthropic,
}

#[derive(Debug, Parser)]
#[command(
    name = "recap",
    about = "Cluster developer activity into themes and features and summarize it",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long,
        env = "RECAP_INPUT",
        default_value = "-",
        help = "Activity items as a JSON array or JSON Lines; '-' reads stdin"
    )]
    pub(crate) input: PathBuf,

    #[arg(
        long,
        env = "RECAP_SINCE_HOURS",
        conflicts_with = "since_days",
        help = "Only include items from the last N hours"
    )]
    pub(crate) since_hours: Option<u32>,

    #[arg(
        long,
        env = "RECAP_SINCE_DAYS",
        help = "Only include items from the last N days"
    )]
    pub(crate) since_days: Option<u32>,

    #[arg(long, env = "RECAP_MODE", value_enum, default_value = "all")]
    pub(crate) mode: CliMode,

    #[arg(long, env = "RECAP_FORMAT", value_enum, default_value = "json")]
    pub(crate) format: CliFormat,

    #[arg(
        long,
        env = "RECAP_THEME_THRESHOLD",
        default_value_t = DEFAULT_THEME_THRESHOLD,
        help = "Minimum average cosine similarity for joining a theme"
    )]
    pub(crate) theme_threshold: f64,

    #[arg(
        long,
        env = "RECAP_FEATURE_THRESHOLD",
        default_value_t = DEFAULT_FEATURE_THRESHOLD,
        help = "Minimum keyword overlap for joining a feature"
    )]
    pub(crate) feature_threshold: f64,

    #[arg(long, env = "RECAP_SUMMARIZER", value_enum, default_value = "none")]
    pub(crate) summarizer: CliSummarizer,

    #[arg(
        long,
        env = "RECAP_MODEL",
        help = "Summarizer model, optionally as provider/model"
    )]
    pub(crate) model: Option<String>,

    #[arg(
        long,
        env = "RECAP_API_BASE",
        help = "Override the summarizer API base URL"
    )]
    pub(crate) api_base: Option<String>,

    #[arg(
        long,
        env = "RECAP_API_KEY",
        hide_env_values = true,
        help = "API key for the summarizer provider"
    )]
    pub(crate) api_key: Option<String>,

    #[arg(
        long,
        env = "RECAP_SUMMARY_TIMEOUT_MS",
        default_value_t = DEFAULT_SUMMARY_TIMEOUT_MS,
        help = "Upper bound on the summarizer call before falling back"
    )]
    pub(crate) summary_timeout_ms: u64,

    #[arg(
        long,
        env = "RECAP_NO_GIT",
        help = "Skip git status lookups and rely on collector metadata"
    )]
    pub(crate) no_git: bool,

    #[arg(
        long,
        env = "RECAP_GIT_TIMEOUT_MS",
        default_value_t = DEFAULT_GIT_TIMEOUT_MS,
        help = "Upper bound on each git status lookup"
    )]
    pub(crate) git_timeout_ms: u64,
}
