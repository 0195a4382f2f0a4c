mod bootstrap;
mod cli;
mod input;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use recap_cluster::{
    build_feature_report, FeatureOptions, FeatureReport, NoRepoStatus, RepoStatusProvider,
    ThematicOptions,
};
use recap_core::{filter_items, ReportPeriod};
use recap_report::{build_thematic_report, GitRepoStatusProvider, Summarizer, ThematicReport};
use serde::Serialize;

use crate::bootstrap::{build_summarizer, init_tracing};
use crate::cli::{Cli, CliFormat};
use crate::input::{parse_items, read_input};
use crate::render::render_text;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecapOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) period: Option<ReportPeriod>,
    pub(crate) item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) thematic: Option<ThematicReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) features: Option<FeatureReport>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let output = run(&cli).await?;
    let rendered = match cli.format {
        CliFormat::Json => {
            serde_json::to_string_pretty(&output).context("failed to serialize recap output")?
        }
        CliFormat::Text => render_text(&output),
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

async fn run(cli: &Cli) -> Result<RecapOutput> {
    let now = Utc::now();
    let raw = read_input(&cli.input)?;
    let mut items = parse_items(&raw)?;

    let period = match (cli.since_hours, cli.since_days) {
        (Some(hours), _) => Some(ReportPeriod::last_hours(now, hours)),
        (None, Some(days)) => Some(ReportPeriod::last_days(now, days)),
        (None, None) => None,
    };
    if let Some(period) = period.as_ref() {
        items = filter_items(&items, period);
    }
    tracing::debug!(items = items.len(), "loaded activity items");

    let thematic = if cli.mode.includes_thematic() {
        let options = ThematicOptions {
            threshold: cli.theme_threshold,
            ..ThematicOptions::default()
        };
        let summarizer: Option<Arc<dyn Summarizer>> = build_summarizer(cli)?;
        let report = build_thematic_report(
            &items,
            &options,
            summarizer.as_deref(),
            Duration::from_millis(cli.summary_timeout_ms.max(1)),
        )
        .await
        .context("invalid thematic clustering options")?;
        Some(report)
    } else {
        None
    };

    let features = if cli.mode.includes_features() {
        let options = FeatureOptions {
            threshold: cli.feature_threshold,
            now,
        };
        let provider: Box<dyn RepoStatusProvider> = if cli.no_git {
            Box::new(NoRepoStatus)
        } else {
            Box::new(
                GitRepoStatusProvider::new()
                    .with_timeout(Duration::from_millis(cli.git_timeout_ms.max(1))),
            )
        };
        // git lookups block on child processes; keep them off the async workers.
        let feature_items = items.clone();
        let report = tokio::task::spawn_blocking(move || {
            build_feature_report(&feature_items, &options, provider.as_ref())
        })
        .await
        .context("feature report task failed")?
        .context("invalid feature clustering options")?;
        Some(report)
    } else {
        None
    };

    Ok(RecapOutput {
        period,
        item_count: items.len(),
        thematic,
        features,
    })
}
