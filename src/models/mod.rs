pub mod activity;
pub mod archive;
pub mod category;
pub mod preferences;
pub mod tab;

pub use activity::ActivityRecord;
pub use archive::{ArchivedTab, WeeklyStats};
pub use category::{CategorizedTabs, Category, CategoryTotals, LegacyCategory};
pub use preferences::{EngineSettings, UserPreferences};
pub use tab::{Tab, TabId};
