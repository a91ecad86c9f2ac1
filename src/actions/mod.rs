//! Batch operations driven off the current classification.

mod archive;
mod batch;
mod report;
mod stats;

pub use archive::TabArchive;
pub use batch::{archive_category, close_category, ArchiveOutcome};
pub use report::{build_report, nudges, Nudge, OldestTab, TabReport};
pub use stats::{summarize_week, WeekSummary, WeeklyStatsLog};
