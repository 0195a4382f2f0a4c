use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Half-open reporting window `[start, end)`.
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn last_hours(now: DateTime<Utc>, hours: u32) -> Self {
        Self::new(now - Duration::hours(i64::from(hours)), now)
    }

    pub fn last_days(now: DateTime<Utc>, days: u32) -> Self {
        Self::new(now - Duration::days(i64::from(days)), now)
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// Keeps the items whose timestamp falls inside `period`, preserving input order.
pub fn filter_items(items: &[ActivityItem], period: &ReportPeriod) -> Vec<ActivityItem> {
    items
        .iter()
        .filter(|item| period.contains(item.timestamp))
        .cloned()
        .collect()
}

/// Returns true when `timestamp` lies strictly within `window` before `now`.
///
/// Timestamps in the future relative to `now` count as recent.
pub fn is_within(timestamp: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now.signed_duration_since(timestamp) < window
}
