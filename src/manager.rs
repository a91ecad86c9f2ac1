use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    actions::{
        archive_category, build_report, close_category, summarize_week, ArchiveOutcome,
        TabArchive, TabReport, WeekSummary, WeeklyStatsLog,
    },
    activity::{ActivityMap, ActivityTracker},
    content::PageSignals,
    engine::{Classification, ClassificationContext, Classifier, ClassifierConfig},
    events::{TabEvent, Trigger},
    learning::{apply_feedback, FeedbackOutcome},
    models::{
        ArchivedTab, CategorizedTabs, Category, EngineSettings, Tab, TabId, UserPreferences,
        WeeklyStats,
    },
    notify::{Notification, Notifier},
    rules::{PatternTable, RuleSet, RuleStore},
    settings::SettingsStore,
    store::{keys, KeyValueStore},
    tabs::TabProvider,
};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

const NOTIFICATION_TITLE: &str = "Tab Warden";

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SweepOutcome {
    /// `false` when `autoCloseZombies` is off and nothing ran.
    pub ran: bool,
    pub zombies_closed: usize,
    pub research: ArchiveOutcome,
}

/// Entry points of the engine: tab lifecycle events, classification,
/// feedback, batch actions and the periodic automation handlers.
pub struct TabManager {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn TabProvider>,
    notifier: Arc<dyn Notifier>,
    tracker: ActivityTracker,
    rules: RuleStore,
    settings: SettingsStore,
    archive: TabArchive,
    weekly_stats: WeeklyStatsLog,
    config: ClassifierConfig,
}

impl TabManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn TabProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            tracker: ActivityTracker::new(Arc::clone(&store)),
            rules: RuleStore::new(Arc::clone(&store)),
            settings: SettingsStore::new(Arc::clone(&store)),
            archive: TabArchive::new(Arc::clone(&store)),
            weekly_stats: WeeklyStatsLog::new(Arc::clone(&store)),
            store,
            provider,
            notifier,
            config: ClassifierConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.tracker
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Seed every persisted key that is still absent with its default.
    /// Returns the keys that were written.
    pub async fn initialize(&self) -> Result<Vec<String>> {
        let existing = self
            .store
            .get(&keys::ALL)
            .await
            .context("failed to read stored keys")?;

        let mut seeded = HashMap::new();
        for key in keys::ALL {
            if existing.get(key).is_some_and(|value| !value.is_null()) {
                continue;
            }
            seeded.insert(key.to_string(), default_value(key)?);
        }

        let mut written: Vec<String> = seeded.keys().cloned().collect();
        written.sort();
        if !seeded.is_empty() {
            self.store
                .set(seeded)
                .await
                .context("failed to seed default keys")?;
            log_info!("initialized storage keys: {}", written.join(", "));
        }
        Ok(written)
    }

    pub async fn on_activated(&self, tab_id: TabId, now: DateTime<Utc>) -> Result<()> {
        self.tracker.on_activated(tab_id, now).await
    }

    pub async fn on_navigated(
        &self,
        tab_id: TabId,
        url: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.tracker.on_navigated(tab_id, url, title, now).await
    }

    pub async fn on_closed(&self, tab_id: TabId, now: DateTime<Utc>) -> Result<()> {
        self.tracker.on_closed(tab_id, now).await.map(|_| ())
    }

    /// Classify one tab, optionally with page signals from a full page context.
    pub async fn classify_tab(
        &self,
        tab: &Tab,
        signals: Option<&PageSignals>,
        now: DateTime<FixedOffset>,
    ) -> Result<Classification> {
        let classifier = self.classifier().await?;
        let rules = self.rules.snapshot().await?;
        let preferences = self.settings.preferences().await?;
        let activity = self.tracker.record(tab.id).await?;

        let ctx = ClassificationContext {
            activity: activity.as_ref(),
            rules: &rules,
            preferences: &preferences,
            signals,
            now,
        };
        Ok(classifier.evaluate(tab, &ctx))
    }

    /// Classify the whole inventory. Active tabs are stamped as accessed first,
    /// so the tab in front of the user is never reported stale.
    pub async fn classify_all(&self, now: DateTime<FixedOffset>) -> Result<CategorizedTabs> {
        let tabs = self
            .provider
            .list_tabs()
            .await
            .context("failed to list tabs")?;

        let active: Vec<TabId> = tabs.iter().filter(|tab| tab.active).map(|tab| tab.id).collect();
        self.tracker
            .touch_many(&active, now.with_timezone(&Utc))
            .await?;

        let classifier = self.classifier().await?;
        let rules = self.rules.snapshot().await?;
        let preferences = self.settings.preferences().await?;
        let records = self.tracker.snapshot().await?;

        Ok(categorize(&classifier, tabs, &records, &rules, &preferences, now))
    }

    pub async fn record_feedback(
        &self,
        url: &str,
        title: Option<&str>,
        category: Category,
    ) -> Result<FeedbackOutcome> {
        let outcome = self
            .rules
            .update(|rules| apply_feedback(rules, url, title, category))
            .await?;
        log_info!(
            "learned {} -> {} ({} title words, {} evicted)",
            outcome.domain_pattern,
            outcome.category,
            outcome.title_words.len(),
            outcome.evicted
        );
        Ok(outcome)
    }

    /// Forget custom rules, learned patterns and all activity history.
    pub async fn reset_learning(&self) -> Result<()> {
        self.rules.clear().await?;
        self.tracker.reset().await?;
        log_info!("learning data reset");
        Ok(())
    }

    pub async fn close_by_category(
        &self,
        category: Category,
        now: DateTime<FixedOffset>,
    ) -> Result<usize> {
        let tabs = self.classify_all(now).await?;
        close_category(self.provider.as_ref(), &tabs, category).await
    }

    pub async fn archive_by_category(
        &self,
        category: Category,
        now: DateTime<FixedOffset>,
    ) -> Result<ArchiveOutcome> {
        let tabs = self.classify_all(now).await?;
        archive_category(
            &self.archive,
            self.provider.as_ref(),
            &tabs,
            category,
            now.with_timezone(&Utc),
        )
        .await
    }

    pub async fn archived_tabs(&self) -> Result<Vec<ArchivedTab>> {
        self.archive.entries().await
    }

    /// Weekly automation: close zombies and, if enabled, archive research tabs.
    pub async fn on_weekly_zombie_sweep(&self, now: DateTime<FixedOffset>) -> Result<SweepOutcome> {
        let preferences = self.settings.preferences().await?;
        if !preferences.auto_close_zombies {
            return Ok(SweepOutcome::default());
        }

        let tabs = self.classify_all(now).await?;
        let zombies_closed = close_category(self.provider.as_ref(), &tabs, Category::Zombie).await?;
        let research = if preferences.auto_archive_research {
            archive_category(
                &self.archive,
                self.provider.as_ref(),
                &tabs,
                Category::Research,
                now.with_timezone(&Utc),
            )
            .await?
        } else {
            ArchiveOutcome::default()
        };

        if zombies_closed > 0 || research.archived > 0 {
            let mut message = format!("Auto-closed {zombies_closed} zombie tabs.");
            if research.archived > 0 {
                message.push_str(&format!(" Archived {} research tabs.", research.archived));
            }
            if let Err(err) = self
                .notifier
                .notify(Notification::new(NOTIFICATION_TITLE, message))
                .await
            {
                log_warn!("failed to deliver sweep notification: {:#}", err);
            }
        }

        Ok(SweepOutcome {
            ran: true,
            zombies_closed,
            research,
        })
    }

    /// Recompute this week's per-category active time and store it.
    pub async fn on_daily_stats_refresh(&self, now: DateTime<FixedOffset>) -> Result<WeekSummary> {
        let classifier = self.classifier().await?;
        let rules = self.rules.snapshot().await?;
        let preferences = self.settings.preferences().await?;
        let records = self.tracker.snapshot().await?;

        let summary = summarize_week(&records, &now, |tab, record| {
            let ctx = ClassificationContext {
                activity: Some(record),
                rules: &rules,
                preferences: &preferences,
                signals: None,
                now,
            };
            classifier.evaluate(tab, &ctx)
        });
        self.weekly_stats.record(&summary).await?;

        log_info!(
            "weekly stats for {}: {} tabs counted, {} skipped",
            summary.week,
            summary.counted,
            summary.skipped
        );
        Ok(summary)
    }

    pub async fn weekly_stats(&self) -> Result<WeeklyStats> {
        self.weekly_stats.all().await
    }

    pub async fn report(&self, now: DateTime<FixedOffset>) -> Result<TabReport> {
        let tabs = self.classify_all(now).await?;
        let records = self.tracker.snapshot().await?;
        Ok(build_report(
            &tabs,
            &records,
            &now,
            (self.config.work_day_start_hour, self.config.work_day_end_hour),
        ))
    }

    pub async fn preferences(&self) -> Result<UserPreferences> {
        self.settings.preferences().await
    }

    pub async fn set_preferences(&self, preferences: UserPreferences) -> Result<()> {
        self.settings.update_preferences(preferences).await
    }

    pub async fn engine_settings(&self) -> Result<EngineSettings> {
        self.settings.engine().await
    }

    pub async fn set_engine_settings(&self, settings: EngineSettings) -> Result<()> {
        self.settings.update_engine(settings).await
    }

    pub async fn dispatch(&self, event: TabEvent, now: DateTime<FixedOffset>) -> Result<()> {
        let at = now.with_timezone(&Utc);
        match event {
            TabEvent::Activated { tab_id } => self.on_activated(tab_id, at).await,
            TabEvent::Navigated { tab_id, url, title } => {
                self.on_navigated(tab_id, &url, title.as_deref(), at).await
            }
            TabEvent::Closed { tab_id } => self.on_closed(tab_id, at).await,
            TabEvent::Alarm(Trigger::WeeklyZombieSweep) => {
                self.on_weekly_zombie_sweep(now).await.map(|_| ())
            }
            TabEvent::Alarm(Trigger::DailyStatsRefresh) => {
                self.on_daily_stats_refresh(now).await.map(|_| ())
            }
        }
    }

    async fn classifier(&self) -> Result<Classifier> {
        let engine = self.settings.engine().await?;
        Ok(Classifier::new(self.config.clone().with_settings(&engine)))
    }
}

fn categorize(
    classifier: &Classifier,
    tabs: Vec<Tab>,
    records: &ActivityMap,
    rules: &RuleSet,
    preferences: &UserPreferences,
    now: DateTime<FixedOffset>,
) -> CategorizedTabs {
    let mut categorized = CategorizedTabs::new();
    for tab in tabs {
        let ctx = ClassificationContext {
            activity: records.get(&tab.id),
            rules,
            preferences,
            signals: None,
            now,
        };
        let category = classifier.classify(&tab, &ctx);
        categorized.push(category, tab);
    }
    categorized
}

fn default_value(key: &str) -> Result<Value> {
    let value = match key {
        keys::CUSTOM_RULES | keys::LEARNED_PATTERNS => {
            serde_json::to_value(PatternTable::default())?
        }
        keys::USER_PREFERENCES => serde_json::to_value(UserPreferences::default())?,
        keys::SETTINGS => serde_json::to_value(EngineSettings::default())?,
        keys::ARCHIVED_TABS => Value::Array(Vec::new()),
        _ => Value::Object(serde_json::Map::new()),
    };
    Ok(value)
}
