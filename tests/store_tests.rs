use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tabwarden_lib::store::{keys, load, save, Batch};
use tabwarden_lib::tabs::JsonTabProvider;
use tabwarden_lib::notify::LogNotifier;
use tabwarden_lib::{
    Category, EngineSettings, KeyValueStore, MemoryStore, SqliteStore, TabManager,
    UserPreferences,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> SqliteStore {
    SqliteStore::open(dir.path().join("state").join("tabwarden.db")).unwrap()
}

#[tokio::test]
async fn sqlite_round_trips_and_omits_absent_keys() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    store
        .set(HashMap::from([
            ("alpha".to_string(), json!({"a": 1})),
            ("beta".to_string(), json!([1, 2, 3])),
        ]))
        .await
        .unwrap();

    let values = store.get(&["alpha", "beta", "gamma"]).await.unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values["alpha"], json!({"a": 1}));
    assert_eq!(values["beta"], json!([1, 2, 3]));
    assert!(!values.contains_key("gamma"));
}

#[tokio::test]
async fn sqlite_last_write_wins_and_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open(&dir);
        save(&store, keys::USER_PREFERENCES, &UserPreferences::default())
            .await
            .unwrap();
        let changed = UserPreferences {
            use_work_hours: false,
            ..UserPreferences::default()
        };
        save(&store, keys::USER_PREFERENCES, &changed).await.unwrap();
    }

    let reopened = open(&dir);
    let prefs: UserPreferences = load(&reopened, keys::USER_PREFERENCES).await.unwrap();
    assert!(!prefs.use_work_hours);
    assert!(prefs.treat_shopping_as_useless);
}

#[tokio::test]
async fn missing_and_partial_values_fall_back_to_defaults() {
    let store = MemoryStore::new();
    let settings: EngineSettings = load(&store, keys::SETTINGS).await.unwrap();
    assert_eq!(settings.zombie_threshold_days, 7.0);

    store
        .set(HashMap::from([(
            keys::USER_PREFERENCES.to_string(),
            json!({"autoCloseZombies": true}),
        )]))
        .await
        .unwrap();
    let prefs: UserPreferences = load(&store, keys::USER_PREFERENCES).await.unwrap();
    assert!(prefs.auto_close_zombies);
    assert!(prefs.use_work_hours);
}

#[tokio::test]
async fn corrupt_values_surface_as_errors() {
    let store = MemoryStore::new();
    store
        .set(HashMap::from([(keys::SETTINGS.to_string(), json!("seven"))]))
        .await
        .unwrap();
    assert!(load::<EngineSettings>(&store, keys::SETTINGS).await.is_err());
}

#[tokio::test]
async fn batch_writes_every_key() {
    let store = MemoryStore::new();
    Batch::new()
        .put("one", &1)
        .unwrap()
        .put("two", &vec!["a", "b"])
        .unwrap()
        .commit(&store)
        .await
        .unwrap();

    assert_eq!(store.raw("one").await, Some(json!(1)));
    assert_eq!(store.raw("two").await, Some(json!(["a", "b"])));
}

#[tokio::test]
async fn manager_state_persists_in_sqlite() {
    let dir = TempDir::new().unwrap();
    let tabs_path = dir.path().join("tabs.json");
    std::fs::write(
        &tabs_path,
        r#"[{"id": 1, "url": "https://cooking.example.org/", "title": "Recipes"}]"#,
    )
    .unwrap();

    {
        let manager = TabManager::new(
            Arc::new(open(&dir)),
            Arc::new(JsonTabProvider::new(tabs_path.clone())),
            Arc::new(LogNotifier),
        );
        manager.initialize().await.unwrap();
        manager
            .record_feedback("https://cooking.example.org/", Some("Recipes"), Category::Timesink)
            .await
            .unwrap();
    }

    let manager = TabManager::new(
        Arc::new(open(&dir)),
        Arc::new(JsonTabProvider::new(tabs_path.clone())),
        Arc::new(LogNotifier),
    );
    let now = chrono::Local::now().fixed_offset();
    let closed = manager.close_by_category(Category::Timesink, now).await.unwrap();
    assert_eq!(closed, 1);
    assert_eq!(std::fs::read_to_string(&tabs_path).unwrap().trim(), "[]");
}

#[tokio::test]
async fn active_interval_carries_across_host_runs() {
    let dir = TempDir::new().unwrap();
    let tabs_path = dir.path().join("tabs.json");
    std::fs::write(&tabs_path, "[]").unwrap();
    let t0 = chrono::Utc::now();

    for (tab_id, at) in [(1, t0), (2, t0 + chrono::Duration::seconds(600))] {
        let manager = TabManager::new(
            Arc::new(open(&dir)),
            Arc::new(JsonTabProvider::new(tabs_path.clone())),
            Arc::new(LogNotifier),
        );
        manager.on_activated(tab_id, at).await.unwrap();
    }

    let manager = TabManager::new(
        Arc::new(open(&dir)),
        Arc::new(JsonTabProvider::new(tabs_path)),
        Arc::new(LogNotifier),
    );
    let record = manager.tracker().record(1).await.unwrap().unwrap();
    assert_eq!(record.active_time_ms, 600_000);
    assert_eq!(manager.tracker().active_tab().await.unwrap(), Some(2));
}
