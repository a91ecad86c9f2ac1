use std::{collections::HashSet, fs, path::PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TabProvider;
use crate::models::{Tab, TabId};

/// Tab inventory kept in a JSON array on disk. Closing rewrites the file.
pub struct JsonTabProvider {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonTabProvider {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<Vec<Tab>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read tabs from {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse tabs in {}", self.path.display()))
    }

    fn write(&self, tabs: &[Tab]) -> Result<()> {
        let serialized = serde_json::to_string_pretty(tabs)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write tabs to {}", self.path.display()))
    }
}

#[async_trait]
impl TabProvider for JsonTabProvider {
    async fn list_tabs(&self) -> Result<Vec<Tab>> {
        let _guard = self.lock.lock().await;
        self.read()
    }

    async fn close_tabs(&self, ids: &[TabId]) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let wanted: HashSet<TabId> = ids.iter().copied().collect();
        let tabs = self.read()?;
        let before = tabs.len();
        let remaining: Vec<Tab> = tabs
            .into_iter()
            .filter(|tab| !wanted.contains(&tab.id))
            .collect();
        let closed = before - remaining.len();
        if closed > 0 {
            self.write(&remaining)?;
        }
        Ok(closed)
    }
}
