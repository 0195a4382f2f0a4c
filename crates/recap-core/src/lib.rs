//! Foundational activity types shared across recap crates.
//!
//! Provides the collector-facing `ActivityItem` record, the typed metadata view
//! the clustering core reads, and reporting-period windows.

pub mod activity;
pub mod context;
pub mod period;

pub use activity::{ActivityItem, ActivityMetadata};
pub use context::{ItemContext, RepoHint};
pub use period::{filter_items, is_within, ReportPeriod};
