use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::archive::TabArchive;
use crate::models::{ArchivedTab, CategorizedTabs, Category};
use crate::tabs::TabProvider;
use crate::log_info;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub archived: usize,
    pub closed: usize,
}

/// Close every tab of `category`. Returns the count the provider actually closed.
pub async fn close_category(
    provider: &dyn TabProvider,
    tabs: &CategorizedTabs,
    category: Category,
) -> Result<usize> {
    let ids = tabs.ids(category);
    if ids.is_empty() {
        return Ok(0);
    }
    let closed = provider.close_tabs(&ids).await?;
    log_info!("closed {}/{} {} tabs", closed, ids.len(), category);
    Ok(closed)
}

/// Append an archive entry per tab, then close them.
///
/// Not transactional: entries already written stay written even when the close
/// reports fewer tabs than requested or fails outright.
pub async fn archive_category(
    archive: &TabArchive,
    provider: &dyn TabProvider,
    tabs: &CategorizedTabs,
    category: Category,
    now: DateTime<Utc>,
) -> Result<ArchiveOutcome> {
    if category != Category::Research {
        bail!("only research tabs can be archived, got '{category}'");
    }

    let matching = tabs.get(category);
    if matching.is_empty() {
        return Ok(ArchiveOutcome::default());
    }

    let entries = matching
        .iter()
        .map(|tab| ArchivedTab {
            url: tab.url.clone(),
            title: tab.title_or_empty().to_string(),
            archived_at: now,
        })
        .collect();
    let archived = archive.append(entries).await?;

    let ids = tabs.ids(category);
    let closed = provider.close_tabs(&ids).await?;
    log_info!("archived {} research tabs, closed {}", archived, closed);

    Ok(ArchiveOutcome { archived, closed })
}
