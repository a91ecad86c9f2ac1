use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::KeyValueStore;

/// In-process store. State lives as long as the value.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of a key, for inspection in tests and diagnostics.
    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.data.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let guard = self.data.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| guard.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        let mut guard = self.data.write().await;
        guard.extend(entries);
        Ok(())
    }
}
