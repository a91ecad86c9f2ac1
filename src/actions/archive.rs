use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use crate::models::ArchivedTab;
use crate::store::{keys, load, save, KeyValueStore};

/// Append-only `archivedTabs` log. Appends are serialized so concurrent
/// archive runs never drop each other's entries.
pub struct TabArchive {
    store: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl TabArchive {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Append `entries`, returning how many were written.
    pub async fn append(&self, entries: Vec<ArchivedTab>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        let _guard = self.lock.lock().await;
        let mut log: Vec<ArchivedTab> = load(self.store.as_ref(), keys::ARCHIVED_TABS)
            .await
            .context("failed to read archived tabs")?;
        let appended = entries.len();
        log.extend(entries);
        save(self.store.as_ref(), keys::ARCHIVED_TABS, &log)
            .await
            .context("failed to write archived tabs")?;
        Ok(appended)
    }

    pub async fn entries(&self) -> Result<Vec<ArchivedTab>> {
        load(self.store.as_ref(), keys::ARCHIVED_TABS).await
    }
}
