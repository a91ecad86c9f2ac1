use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::activity::ActivityMap;
use crate::engine::{Basis, Classification};
use crate::models::{ActivityRecord, CategoryTotals, Tab, WeeklyStats};
use crate::store::{keys, load, save, KeyValueStore};
use crate::utils::time::{accessed_this_week, week_start};
use crate::log_warn;

const ENABLE_LOGS: bool = true;

/// Per-category active time for the week containing `now`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WeekSummary {
    /// `YYYY-MM-DD` of the week's Sunday.
    pub week: String,
    pub totals: CategoryTotals,
    pub counted: usize,
    pub skipped: usize,
}

/// Classify every record touched since the start of the week and sum its
/// active time into the resulting category. Records with no URL, or whose
/// URL/title do not classify, are skipped.
pub fn summarize_week<F>(
    records: &ActivityMap,
    now: &DateTime<FixedOffset>,
    mut classify: F,
) -> WeekSummary
where
    F: FnMut(&Tab, &ActivityRecord) -> Classification,
{
    let mut summary = WeekSummary {
        week: week_start(now).format("%Y-%m-%d").to_string(),
        ..WeekSummary::default()
    };

    let mut ids: Vec<_> = records.keys().copied().collect();
    ids.sort_unstable();

    for id in ids {
        let Some(record) = records.get(&id) else {
            continue;
        };
        if !accessed_this_week(record.last_accessed, now) {
            continue;
        }
        let Some(url) = record.url.as_deref() else {
            log_warn!("tab {} has no recorded url, left out of weekly stats", id);
            summary.skipped += 1;
            continue;
        };

        let tab = Tab {
            id,
            url: url.to_string(),
            title: Some(record.title.clone().unwrap_or_default()),
            active: false,
        };
        let classification = classify(&tab, record);
        if matches!(classification.basis, Basis::Malformed { .. }) {
            summary.skipped += 1;
            continue;
        }

        summary.totals.add(classification.category, record.active_time_ms);
        summary.counted += 1;
    }

    summary
}

/// `weeklyStats` map, updated one week at a time.
pub struct WeeklyStatsLog {
    store: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl WeeklyStatsLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Replace the entry for `summary.week`.
    pub async fn record(&self, summary: &WeekSummary) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut stats: WeeklyStats = load(self.store.as_ref(), keys::WEEKLY_STATS)
            .await
            .context("failed to read weekly stats")?;
        stats.insert(summary.week.clone(), summary.totals.clone());
        save(self.store.as_ref(), keys::WEEKLY_STATS, &stats)
            .await
            .context("failed to write weekly stats")
    }

    pub async fn all(&self) -> Result<WeeklyStats> {
        load(self.store.as_ref(), keys::WEEKLY_STATS).await
    }
}
