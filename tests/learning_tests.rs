use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use tabwarden_lib::notify::LogNotifier;
use tabwarden_lib::rules::MAX_LEARNED_PATTERNS;
use tabwarden_lib::store::keys;
use tabwarden_lib::tabs::TabProvider;
use tabwarden_lib::{
    apply_feedback, Category, KeyValueStore, MemoryStore, RuleSet, RuleStore, Tab, TabId,
    TabManager,
};

struct NoTabs;

#[async_trait::async_trait]
impl TabProvider for NoTabs {
    async fn list_tabs(&self) -> anyhow::Result<Vec<Tab>> {
        Ok(Vec::new())
    }

    async fn close_tabs(&self, _ids: &[TabId]) -> anyhow::Result<usize> {
        Ok(0)
    }
}

fn manager(store: Arc<MemoryStore>) -> TabManager {
    TabManager::new(store, Arc::new(NoTabs), Arc::new(LogNotifier))
}

#[test]
fn feedback_keeps_domain_in_exactly_one_custom_category() {
    let mut rules = RuleSet::default();
    let url = "https://mail.google.com/mail/u/0";

    for category in [
        Category::Priority,
        Category::Timesink,
        Category::Zombie,
        Category::Research,
        Category::Timesink,
    ] {
        let outcome = apply_feedback(&mut rules, url, Some("Inbox"), category).unwrap();
        assert_eq!(outcome.domain_pattern, "google.com");
        assert_eq!(rules.custom_rules.categories_of("google.com"), vec![category]);
    }
}

#[test]
fn feedback_records_domain_and_title_words() {
    let mut rules = RuleSet::default();
    let outcome = apply_feedback(
        &mut rules,
        "https://www.reddit.com/r/rust",
        Some("Why is the borrow checker yelling"),
        Category::Timesink,
    )
    .unwrap();

    assert_eq!(outcome.title_words, vec!["borrow", "checker", "yelling"]);
    assert_eq!(
        rules.learned_patterns.timesink,
        vec!["reddit.com", "borrow", "checker", "yelling"]
    );

    // Repeating the same correction adds nothing new.
    apply_feedback(
        &mut rules,
        "https://reddit.com/r/rust",
        Some("Why is the borrow checker yelling"),
        Category::Timesink,
    )
    .unwrap();
    assert_eq!(rules.learned_patterns.timesink.len(), 4);
}

#[test]
fn learned_patterns_may_repeat_across_categories() {
    let mut rules = RuleSet::default();
    apply_feedback(
        &mut rules,
        "https://a.example.com",
        Some("Quarterly planning"),
        Category::Priority,
    )
    .unwrap();
    apply_feedback(
        &mut rules,
        "https://b.example.com",
        Some("Quarterly memes"),
        Category::Timesink,
    )
    .unwrap();

    let categories = rules.learned_patterns.categories_of("quarterly");
    assert_eq!(categories, vec![Category::Priority, Category::Timesink]);
    assert_eq!(rules.custom_rules.categories_of("example.com"), vec![Category::Timesink]);
}

#[test]
fn learned_patterns_are_capped_oldest_first() {
    let mut rules = RuleSet::default();
    for i in 0..60 {
        let title = format!("word{i:02}");
        apply_feedback(&mut rules, "https://notes.example.com", Some(&title), Category::Research)
            .unwrap();
    }

    let research = &rules.learned_patterns.research;
    assert!(research.len() <= MAX_LEARNED_PATTERNS);
    assert!(!research.iter().any(|p| p == "word00"));
    assert!(!research.iter().any(|p| p == "word09"));
    assert_eq!(research.last().map(String::as_str), Some("word59"));
}

#[tokio::test]
async fn rule_updates_persist_both_keys_together() {
    let store = Arc::new(MemoryStore::new());
    let rules = RuleStore::new(store.clone());

    rules
        .update(|set| {
            apply_feedback(set, "https://github.com/a/b", Some("Review queue"), Category::Priority)
        })
        .await
        .unwrap();

    let custom = store.raw(keys::CUSTOM_RULES).await.unwrap();
    let learned = store.raw(keys::LEARNED_PATTERNS).await.unwrap();
    assert_eq!(custom["priority"], serde_json::json!(["github.com"]));
    assert_eq!(learned["priority"], serde_json::json!(["github.com", "review", "queue"]));

    let reloaded = RuleStore::new(store.clone()).snapshot().await.unwrap();
    assert_eq!(reloaded.custom_rules.priority, vec!["github.com"]);
}

#[tokio::test]
async fn failed_update_leaves_rules_untouched() {
    let store = Arc::new(MemoryStore::new());
    let rules = RuleStore::new(store.clone());

    let result = rules
        .update(|set| apply_feedback(set, "not a url", Some("x"), Category::Priority))
        .await;
    assert!(result.is_err());
    assert_eq!(*rules.snapshot().await.unwrap(), RuleSet::default());
    assert!(store.get(&[keys::CUSTOM_RULES]).await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshots_taken_before_an_update_stay_consistent() {
    let store = Arc::new(MemoryStore::new());
    let rules = RuleStore::new(store);

    let before = rules.snapshot().await.unwrap();
    rules
        .update(|set| {
            apply_feedback(set, "https://x.org", Some("Cooking blog"), Category::Timesink)
        })
        .await
        .unwrap();
    let after = rules.snapshot().await.unwrap();

    assert!(before.custom_rules.timesink.is_empty());
    assert!(before.learned_patterns.timesink.is_empty());
    assert_eq!(after.custom_rules.timesink, vec!["x.org"]);
    assert_eq!(after.learned_patterns.timesink, vec!["x.org", "cooking", "blog"]);
}

#[tokio::test]
async fn feedback_changes_future_classification() {
    let manager = manager(Arc::new(MemoryStore::new()));
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 10, 11, 0, 0)
        .unwrap();
    let tab = Tab::new(1, "https://www.plain.org/recipes", "Weeknight recipes");

    let before = manager.classify_tab(&tab, None, now).await.unwrap();
    assert_eq!(before.category, Category::Unknown);

    manager
        .record_feedback(&tab.url, tab.title.as_deref(), Category::Research)
        .await
        .unwrap();
    let after = manager.classify_tab(&tab, None, now).await.unwrap();
    assert_eq!(after.category, Category::Research);

    // Another page on a different site sharing a learned title word.
    let sibling = Tab::new(2, "https://other.net/", "Easy recipes for two");
    let learned = manager.classify_tab(&sibling, None, now).await.unwrap();
    assert_eq!(learned.category, Category::Research);
}

#[tokio::test]
async fn reset_learning_clears_rules_and_activity() {
    let store = Arc::new(MemoryStore::new());
    let manager = manager(store.clone());
    let now = chrono::Utc::now();

    manager
        .record_feedback("https://github.com/x", Some("Work items"), Category::Priority)
        .await
        .unwrap();
    manager.on_activated(4, now).await.unwrap();

    manager.reset_learning().await.unwrap();

    let rules = manager.rules().snapshot().await.unwrap();
    assert_eq!(*rules, RuleSet::default());
    assert!(manager.tracker().record(4).await.unwrap().is_none());
    assert_eq!(
        store.raw(keys::TAB_LAST_ACCESSED).await.unwrap(),
        serde_json::json!({})
    );
}
