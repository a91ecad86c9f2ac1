use serde::{Deserialize, Serialize};

/// Browser-assigned tab identifier. Ids are transient and may be reused after a close.
pub type TabId = i64;

/// Snapshot of an open tab as reported by the tab inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Tab {
    pub fn new(id: TabId, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: Some(title.into()),
            active: false,
        }
    }

    pub fn activated(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}
