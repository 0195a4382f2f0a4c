use std::path::PathBuf;

use serde_json::Value;

use crate::activity::ActivityMetadata;

pub const METADATA_KEY_REPO: &str = "repo";
pub const METADATA_KEY_DIRTY: &str = "dirty";
pub const METADATA_KEY_AHEAD: &str = "ahead";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Repository facts a collector recorded alongside an item.
pub struct RepoHint {
    pub path: Option<PathBuf>,
    pub dirty: Option<bool>,
    pub ahead: Option<u32>,
}

impl RepoHint {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.dirty.is_none() && self.ahead.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Typed view of the metadata keys the clustering core reads.
///
/// Built once per item; everything downstream works with these fields rather
/// than probing the raw metadata map again.
pub struct ItemContext {
    pub repo: RepoHint,
}

impl ItemContext {
    pub fn from_metadata(metadata: &ActivityMetadata) -> Self {
        let path = string_field(metadata, METADATA_KEY_REPO).map(PathBuf::from);
        let dirty = match metadata.get(METADATA_KEY_DIRTY) {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(other) => {
                tracing::debug!(key = METADATA_KEY_DIRTY, value = %other, "ignoring non-boolean metadata");
                None
            }
        };
        let ahead = match metadata.get(METADATA_KEY_AHEAD) {
            None => None,
            Some(value) => match value.as_u64().and_then(|count| u32::try_from(count).ok()) {
                Some(count) => Some(count),
                None => {
                    tracing::debug!(key = METADATA_KEY_AHEAD, value = %value, "ignoring non-count metadata");
                    None
                }
            },
        };

        Self {
            repo: RepoHint { path, dirty, ahead },
        }
    }
}

fn string_field(metadata: &ActivityMetadata, key: &str) -> Option<String> {
    match metadata.get(key) {
        None => None,
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(other) => {
            tracing::debug!(key, value = %other, "ignoring non-string metadata");
            None
        }
    }
}
