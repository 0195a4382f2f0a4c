use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use recap_core::ActivityItem;

pub(crate) fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read activity items from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read activity items from {}", path.display()))
}

/// Accepts a JSON array of items or one item per line (JSON Lines).
pub(crate) fn parse_items(raw: &str) -> Result<Vec<ActivityItem>> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("failed to parse activity item array");
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<ActivityItem>(line)
                .with_context(|| format!("failed to parse activity item on line {}", index + 1))
        })
        .collect()
}
