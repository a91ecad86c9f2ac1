//! Tab inventory seam.

mod json;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Tab, TabId};

pub use json::JsonTabProvider;

#[async_trait]
pub trait TabProvider: Send + Sync {
    /// Snapshot of the currently open tabs; may be stale by the time actions run.
    async fn list_tabs(&self) -> Result<Vec<Tab>>;

    /// Best-effort close. Ids that are already gone are skipped, not errors.
    /// Returns the number of tabs actually closed.
    async fn close_tabs(&self, ids: &[TabId]) -> Result<usize>;
}
