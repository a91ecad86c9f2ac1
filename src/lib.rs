pub mod actions;
pub mod activity;
mod cli;
pub mod content;
pub mod domain;
pub mod engine;
pub mod events;
pub mod learning;
pub mod manager;
pub mod models;
pub mod notify;
pub mod rules;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod tabs;
mod utils;

pub use actions::{ArchiveOutcome, Nudge, TabReport, WeekSummary};
pub use activity::ActivityTracker;
pub use content::{extract_signals, PageSignals, PageSnapshot};
pub use engine::{Basis, Classification, ClassificationContext, Classifier, ClassifierConfig};
pub use events::{TabEvent, Trigger};
pub use learning::{apply_feedback, FeedbackOutcome};
pub use manager::{SweepOutcome, TabManager};
pub use models::{
    ActivityRecord, ArchivedTab, CategorizedTabs, Category, EngineSettings, LegacyCategory, Tab,
    TabId, UserPreferences,
};
pub use rules::{RuleSet, RuleStore};
pub use scheduler::AutomationScheduler;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use utils::init_logging;
pub use utils::time;

pub use cli::run;
