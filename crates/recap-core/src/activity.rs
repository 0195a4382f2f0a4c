use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque collector metadata attached to an activity record.
pub type ActivityMetadata = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One timestamped activity record produced by an upstream collector.
pub struct ActivityItem {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ActivityMetadata,
}

impl ActivityItem {
    pub fn new(
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            timestamp,
            title: title.into(),
            description: None,
            metadata: ActivityMetadata::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Title and description joined by a single space.
    pub fn text(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => {
                format!("{} {}", self.title, description)
            }
            _ => self.title.clone(),
        }
    }
}
