//! Persistent key-value store seam.
//!
//! The engine only ever talks to [`KeyValueStore`]; hosts pick the backend
//! ([`MemoryStore`] for tests and ephemeral use, [`SqliteStore`] for durable state).

mod memory;
mod sqlite;

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Logical keys of persisted state.
pub mod keys {
    pub const TAB_ANALYTICS: &str = "tabAnalytics";
    pub const TAB_LAST_ACCESSED: &str = "tabLastAccessed";
    pub const CUSTOM_RULES: &str = "customRules";
    pub const LEARNED_PATTERNS: &str = "learnedPatterns";
    pub const USER_PREFERENCES: &str = "userPreferences";
    pub const ARCHIVED_TABS: &str = "archivedTabs";
    pub const WEEKLY_STATS: &str = "weeklyStats";
    pub const SETTINGS: &str = "settings";
    /// Interval of the tab in front of the user; `null` when none is open.
    /// Written alongside `tabAnalytics` and never seeded.
    pub const ACTIVE_INTERVAL: &str = "activeInterval";

    /// Keys seeded with defaults on first run.
    pub const ALL: [&str; 8] = [
        TAB_ANALYTICS,
        TAB_LAST_ACCESSED,
        CUSTOM_RULES,
        LEARNED_PATTERNS,
        USER_PREFERENCES,
        ARCHIVED_TABS,
        WEEKLY_STATS,
        SETTINGS,
    ];
}

/// Asynchronous string-keyed store of JSON values.
///
/// `get` omits absent keys from the returned map. `set` is last-write-wins per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>>;

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()>;
}

/// Decode `key` from a fetched map, falling back to `T::default()` when absent or null.
pub fn decode_or_default<T>(values: &mut HashMap<String, Value>, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match values.remove(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .with_context(|| format!("failed to decode stored value for '{key}'")),
    }
}

/// Fetch and decode a single key.
pub async fn load<T>(store: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let mut values = store.get(&[key]).await?;
    decode_or_default(&mut values, key)
}

/// Encode and write a single key.
pub async fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_value(value)
        .with_context(|| format!("failed to encode value for '{key}'"))?;
    store.set(HashMap::from([(key.to_string(), encoded)])).await
}

/// Accumulates several encoded keys for one `set` call.
#[derive(Default)]
pub struct Batch {
    entries: HashMap<String, Value>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T>(mut self, key: &str, value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_value(value)
            .with_context(|| format!("failed to encode value for '{key}'"))?;
        self.entries.insert(key.to_string(), encoded);
        Ok(self)
    }

    pub async fn commit(self, store: &dyn KeyValueStore) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        store.set(self.entries).await
    }
}
