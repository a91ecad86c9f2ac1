use serde::{Deserialize, Serialize};

/// User toggles read by the classifier and the automation sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub use_work_hours: bool,
    pub treat_shopping_as_useless: bool,
    pub auto_close_zombies: bool,
    pub auto_archive_research: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            use_work_hours: true,
            treat_shopping_as_useless: true,
            auto_close_zombies: false,
            auto_archive_research: false,
        }
    }
}

/// Engine-level settings persisted under `settings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub zombie_threshold_days: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            zombie_threshold_days: 7.0,
        }
    }
}
