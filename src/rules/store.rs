use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{Mutex, RwLock};

use super::{PatternTable, RuleSet};
use crate::store::{decode_or_default, keys, Batch, KeyValueStore};

/// Cached, atomically-swapped view of `customRules` + `learnedPatterns`.
///
/// Readers take an `Arc` snapshot; writers are serialized and publish a fully
/// built rule set only after it has been persisted, so no reader ever observes
/// a half-updated category list.
pub struct RuleStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Arc<RuleSet>>>,
    writer: Mutex<()>,
}

impl RuleStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Result<Arc<RuleSet>> {
        if let Some(rules) = self.current.read().await.as_ref() {
            return Ok(Arc::clone(rules));
        }

        let mut guard = self.current.write().await;
        if let Some(rules) = guard.as_ref() {
            return Ok(Arc::clone(rules));
        }
        let loaded = Arc::new(self.load().await?);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Apply `mutate` to a copy of the current rules, persist both keys in one
    /// write, then publish. If `mutate` or the write fails nothing changes.
    pub async fn update<F, T>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut RuleSet) -> Result<T>,
    {
        let _writer = self.writer.lock().await;
        let base = self.snapshot().await?;
        let mut next = (*base).clone();
        let outcome = mutate(&mut next)?;

        Batch::new()
            .put(keys::CUSTOM_RULES, &next.custom_rules)?
            .put(keys::LEARNED_PATTERNS, &next.learned_patterns)?
            .commit(self.store.as_ref())
            .await
            .context("failed to persist rule set")?;

        *self.current.write().await = Some(Arc::new(next));
        Ok(outcome)
    }

    /// Drop every custom rule and learned pattern.
    pub async fn clear(&self) -> Result<()> {
        self.update(|rules| {
            *rules = RuleSet::default();
            Ok(())
        })
        .await
    }

    async fn load(&self) -> Result<RuleSet> {
        let mut values = self
            .store
            .get(&[keys::CUSTOM_RULES, keys::LEARNED_PATTERNS])
            .await
            .context("failed to read rule set")?;

        Ok(RuleSet {
            custom_rules: decode_or_default::<PatternTable>(&mut values, keys::CUSTOM_RULES)?,
            learned_patterns: decode_or_default::<PatternTable>(
                &mut values,
                keys::LEARNED_PATTERNS,
            )?,
        })
    }
}
