use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use crate::models::{EngineSettings, UserPreferences};
use crate::store::{decode_or_default, keys, save, KeyValueStore};

#[derive(Debug, Clone, Default)]
struct CachedSettings {
    engine: EngineSettings,
    preferences: UserPreferences,
}

/// Cached `settings` and `userPreferences`, written through to the key-value store.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Option<CachedSettings>>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(None),
        }
    }

    pub async fn preferences(&self) -> Result<UserPreferences> {
        Ok(self.cached().await?.preferences)
    }

    pub async fn engine(&self) -> Result<EngineSettings> {
        Ok(self.cached().await?.engine)
    }

    pub async fn update_preferences(&self, preferences: UserPreferences) -> Result<()> {
        let mut guard = self.data.write().await;
        save(self.store.as_ref(), keys::USER_PREFERENCES, &preferences)
            .await
            .context("Failed to write user preferences")?;
        let mut current = match guard.take() {
            Some(current) => current,
            None => self.load().await?,
        };
        current.preferences = preferences;
        *guard = Some(current);
        Ok(())
    }

    pub async fn update_engine(&self, engine: EngineSettings) -> Result<()> {
        let mut guard = self.data.write().await;
        save(self.store.as_ref(), keys::SETTINGS, &engine)
            .await
            .context("Failed to write engine settings")?;
        let mut current = match guard.take() {
            Some(current) => current,
            None => self.load().await?,
        };
        current.engine = engine;
        *guard = Some(current);
        Ok(())
    }

    /// Drop the cache so the next read goes back to the store.
    pub async fn reload(&self) {
        *self.data.write().await = None;
    }

    async fn cached(&self) -> Result<CachedSettings> {
        if let Some(current) = self.data.read().await.as_ref() {
            return Ok(current.clone());
        }
        let mut guard = self.data.write().await;
        if let Some(current) = guard.as_ref() {
            return Ok(current.clone());
        }
        let loaded = self.load().await?;
        *guard = Some(loaded.clone());
        Ok(loaded)
    }

    async fn load(&self) -> Result<CachedSettings> {
        let mut values = self
            .store
            .get(&[keys::SETTINGS, keys::USER_PREFERENCES])
            .await
            .context("Failed to read settings")?;
        Ok(CachedSettings {
            engine: decode_or_default(&mut values, keys::SETTINGS)?,
            preferences: decode_or_default(&mut values, keys::USER_PREFERENCES)?,
        })
    }
}
