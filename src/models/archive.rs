use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::CategoryTotals;

/// Entry of the append-only `archivedTabs` log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedTab {
    pub url: String,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub archived_at: DateTime<Utc>,
}

/// `weeklyStats`: ISO date of the week's Sunday -> active time per category.
pub type WeeklyStats = std::collections::BTreeMap<String, CategoryTotals>;
