use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::models::{ActivityRecord, TabId};
use crate::store::{decode_or_default, keys, Batch, KeyValueStore};
use crate::utils::time::{days_between, elapsed_ms};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = false;

pub type ActivityMap = HashMap<TabId, ActivityRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterval {
    tab_id: TabId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct TrackerState {
    records: Option<ActivityMap>,
    open: Option<OpenInterval>,
}

/// Per-tab access bookkeeping with write-through persistence.
///
/// Every mutation runs under one writer lock as a read-modify-write of the
/// whole `tabAnalytics` map, mirrored into the legacy `tabLastAccessed` key.
/// The open interval is stored next to them in `activeInterval`, so a tracker
/// built over the same store later still closes it. The cache only advances
/// once the write has been acknowledged.
pub struct ActivityTracker {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<TrackerState>,
}

impl ActivityTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Close the previous interval, open one for `tab_id`, stamp `lastAccessed`.
    pub async fn on_activated(&self, tab_id: TabId, now: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut records = self.cached(&mut state).await?.clone();

        if let Some(open) = state.open {
            flush_interval(&mut records, open, now);
        }

        let record = records
            .entry(tab_id)
            .or_insert_with(|| ActivityRecord::first_observed(now));
        record.last_accessed = now;

        let open = Some(OpenInterval {
            tab_id,
            started_at: now,
        });
        self.persist(&records, open).await?;
        state.records = Some(records);
        state.open = open;
        Ok(())
    }

    /// Count a completed navigation and refresh the stored url/title.
    pub async fn on_navigated(
        &self,
        tab_id: TabId,
        url: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut records = self.cached(&mut state).await?.clone();

        let record = records
            .entry(tab_id)
            .or_insert_with(|| ActivityRecord::first_observed(now));
        record.visit_count = record.visit_count.saturating_add(1);
        record.last_accessed = now;
        record.url = Some(url.to_string());
        if let Some(title) = title {
            record.title = Some(title.to_string());
        }

        self.persist(&records, state.open).await?;
        state.records = Some(records);
        Ok(())
    }

    /// Flush any open interval for `tab_id`, then purge its record so a reused id starts fresh.
    pub async fn on_closed(
        &self,
        tab_id: TabId,
        now: DateTime<Utc>,
    ) -> Result<Option<ActivityRecord>> {
        let mut state = self.state.lock().await;
        let mut records = self.cached(&mut state).await?.clone();

        let mut open = state.open;
        if let Some(interval) = open.filter(|interval| interval.tab_id == tab_id) {
            flush_interval(&mut records, interval, now);
            open = None;
        }
        let removed = records.remove(&tab_id);

        self.persist(&records, open).await?;
        state.records = Some(records);
        state.open = open;

        if let Some(record) = removed.as_ref() {
            log_info!(
                "purged tab {} ({} ms active, {} visits)",
                tab_id,
                record.active_time_ms,
                record.visit_count
            );
        }
        Ok(removed)
    }

    /// Mark `tab_id` as accessed at `now` without touching counters.
    pub async fn touch(&self, tab_id: TabId, now: DateTime<Utc>) -> Result<()> {
        self.touch_many(&[tab_id], now).await
    }

    pub async fn touch_many(&self, tab_ids: &[TabId], now: DateTime<Utc>) -> Result<()> {
        if tab_ids.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let mut records = self.cached(&mut state).await?.clone();

        for tab_id in tab_ids {
            records
                .entry(*tab_id)
                .or_insert_with(|| ActivityRecord::first_observed(now))
                .last_accessed = now;
        }

        self.persist(&records, state.open).await?;
        state.records = Some(records);
        Ok(())
    }

    /// Days since the last access of `tab_id`; 0 for a tab never tracked.
    pub async fn days_since_access(&self, tab_id: TabId, now: DateTime<Utc>) -> Result<f64> {
        Ok(self
            .record(tab_id)
            .await?
            .map(|record| days_between(record.last_accessed, now))
            .unwrap_or(0.0))
    }

    pub async fn record(&self, tab_id: TabId) -> Result<Option<ActivityRecord>> {
        let mut state = self.state.lock().await;
        Ok(self.cached(&mut state).await?.get(&tab_id).cloned())
    }

    pub async fn snapshot(&self) -> Result<ActivityMap> {
        let mut state = self.state.lock().await;
        Ok(self.cached(&mut state).await?.clone())
    }

    /// Tab currently holding the open interval, if any.
    pub async fn active_tab(&self) -> Result<Option<TabId>> {
        let mut state = self.state.lock().await;
        self.cached(&mut state).await?;
        Ok(state.open.map(|open| open.tab_id))
    }

    /// Forget every record and the open interval.
    pub async fn reset(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let empty = ActivityMap::new();
        self.persist(&empty, None).await?;
        state.records = Some(empty);
        state.open = None;
        Ok(())
    }

    async fn cached<'a>(&self, state: &'a mut TrackerState) -> Result<&'a ActivityMap> {
        if state.records.is_none() {
            let (records, open) = self.load().await?;
            state.records = Some(records);
            state.open = open;
        }
        Ok(state.records.get_or_insert_with(ActivityMap::new))
    }

    /// A `tabAnalytics` value that is not a map fails the load. Single records
    /// that no longer decode are dropped and the rest are kept.
    async fn load(&self) -> Result<(ActivityMap, Option<OpenInterval>)> {
        let mut values = self
            .store
            .get(&[keys::TAB_ANALYTICS, keys::ACTIVE_INTERVAL])
            .await
            .context("failed to read tab analytics")?;

        let raw: HashMap<TabId, Value> = decode_or_default(&mut values, keys::TAB_ANALYTICS)?;
        let mut records = ActivityMap::with_capacity(raw.len());
        for (tab_id, value) in raw {
            match serde_json::from_value::<ActivityRecord>(value) {
                Ok(record) => {
                    records.insert(tab_id, record);
                }
                Err(err) => {
                    log_warn!("dropping unreadable activity record for tab {}: {}", tab_id, err);
                }
            }
        }

        let open = match decode_or_default::<Option<OpenInterval>>(
            &mut values,
            keys::ACTIVE_INTERVAL,
        ) {
            Ok(open) => open.filter(|open| records.contains_key(&open.tab_id)),
            Err(err) => {
                log_warn!("ignoring unreadable active interval: {:#}", err);
                None
            }
        };
        Ok((records, open))
    }

    async fn persist(&self, records: &ActivityMap, open: Option<OpenInterval>) -> Result<()> {
        let last_accessed: HashMap<TabId, i64> = records
            .iter()
            .map(|(id, record)| (*id, record.last_accessed.timestamp_millis()))
            .collect();

        Batch::new()
            .put(keys::TAB_ANALYTICS, records)?
            .put(keys::TAB_LAST_ACCESSED, &last_accessed)?
            .put(keys::ACTIVE_INTERVAL, &open)?
            .commit(self.store.as_ref())
            .await
            .context("failed to persist tab analytics")
    }
}

fn flush_interval(records: &mut ActivityMap, open: OpenInterval, now: DateTime<Utc>) {
    if let Some(record) = records.get_mut(&open.tab_id) {
        record.active_time_ms = record
            .active_time_ms
            .saturating_add(elapsed_ms(open.started_at, now));
    }
}
