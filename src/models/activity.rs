//! Per-tab access bookkeeping persisted under `tabAnalytics`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_accessed: DateTime<Utc>,
    #[serde(default)]
    pub active_time_ms: u64,
    #[serde(default)]
    pub visit_count: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub first_seen: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ActivityRecord {
    pub fn first_observed(now: DateTime<Utc>) -> Self {
        Self {
            last_accessed: now,
            active_time_ms: 0,
            visit_count: 0,
            first_seen: now,
            url: None,
            title: None,
        }
    }
}
