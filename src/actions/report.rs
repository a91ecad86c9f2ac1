use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::activity::ActivityMap;
use crate::domain::rule_domain;
use crate::models::{CategorizedTabs, Category, TabId};
use crate::rules::builtin::{domain_in, PROCRASTINATION_DOMAINS, SOCIAL_DOMAINS};
use crate::utils::time::{accessed_this_week, days_between, is_work_hours};

const SOCIAL_NUDGE_MIN: usize = 3;
const YOUTUBE_NUDGE_MIN: usize = 5;
const TAB_OVERLOAD_ABOVE: usize = 30;
const RESEARCH_BACKLOG_ABOVE: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Nudge {
    SocialOverload { count: usize },
    VideoBinge { count: usize },
    Zombies { count: usize },
    TabOverload { count: usize },
    ResearchBacklog { count: usize },
    Procrastination { domain: String },
}

impl Nudge {
    pub fn message(&self) -> String {
        match self {
            Nudge::SocialOverload { count } => {
                format!("You have {count} social media tabs open. Productivity has left the chat.")
            }
            Nudge::VideoBinge { count } => {
                format!("{count} YouTube tabs? That's a whole series worth of procrastination.")
            }
            Nudge::Zombies { count } => {
                format!("{count} zombie tabs detected. They remember Internet Explorer.")
            }
            Nudge::TabOverload { count } => {
                format!("{count} tabs are eating your RAM like it's a buffet.")
            }
            Nudge::ResearchBacklog { count } => {
                format!("{count} research tabs? Either a thesis or a reading habit.")
            }
            Nudge::Procrastination { domain } => {
                format!("{domain} during work hours. Back to it?")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OldestTab {
    pub tab_id: TabId,
    pub title: String,
    pub days_since_access: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabReport {
    pub total_tabs: usize,
    pub counts: BTreeMap<Category, usize>,
    pub oldest_tab: Option<OldestTab>,
    pub active_time_this_week_ms: u64,
    pub nudges: Vec<Nudge>,
}

/// Summarize the current classification and activity.
pub fn build_report(
    tabs: &CategorizedTabs,
    records: &ActivityMap,
    now: &DateTime<FixedOffset>,
    work_hours: (u32, u32),
) -> TabReport {
    let now_utc = now.with_timezone(&Utc);
    let counts: BTreeMap<Category, usize> = Category::ALL
        .iter()
        .map(|category| (*category, tabs.count(*category)))
        .collect();

    // Oldest among tabs that are still open.
    let oldest_tab = tabs
        .iter()
        .filter_map(|(_, tab)| {
            records.get(&tab.id).map(|record| OldestTab {
                tab_id: tab.id,
                title: tab.title_or_empty().to_string(),
                days_since_access: days_between(record.last_accessed, now_utc),
            })
        })
        .filter(|oldest| oldest.days_since_access > 0.0)
        .max_by(|a, b| a.days_since_access.total_cmp(&b.days_since_access));

    let active_time_this_week_ms = records
        .values()
        .filter(|record| accessed_this_week(record.last_accessed, now))
        .map(|record| record.active_time_ms)
        .fold(0u64, u64::saturating_add);

    TabReport {
        total_tabs: tabs.total(),
        counts,
        oldest_tab,
        active_time_this_week_ms,
        nudges: nudges(tabs, now, work_hours),
    }
}

pub fn nudges(
    tabs: &CategorizedTabs,
    now: &DateTime<FixedOffset>,
    work_hours: (u32, u32),
) -> Vec<Nudge> {
    let mut nudges = Vec::new();
    let timesinks = tabs.get(Category::Timesink);

    let social = timesinks
        .iter()
        .filter(|tab| SOCIAL_DOMAINS.iter().any(|site| tab.url.contains(site)))
        .count();
    if social >= SOCIAL_NUDGE_MIN {
        nudges.push(Nudge::SocialOverload { count: social });
    }

    let youtube = timesinks
        .iter()
        .filter(|tab| tab.url.contains("youtube.com"))
        .count();
    if youtube >= YOUTUBE_NUDGE_MIN {
        nudges.push(Nudge::VideoBinge { count: youtube });
    }

    let zombies = tabs.count(Category::Zombie);
    if zombies > 0 {
        nudges.push(Nudge::Zombies { count: zombies });
    }

    let total = tabs.total();
    if total > TAB_OVERLOAD_ABOVE {
        nudges.push(Nudge::TabOverload { count: total });
    }

    let research = tabs.count(Category::Research);
    if research > RESEARCH_BACKLOG_ABOVE {
        nudges.push(Nudge::ResearchBacklog { count: research });
    }

    if is_work_hours(now, work_hours.0, work_hours.1) {
        let distracted = timesinks
            .iter()
            .filter(|tab| tab.active)
            .filter_map(|tab| rule_domain(&tab.url).ok())
            .find(|domain| domain_in(domain, PROCRASTINATION_DOMAINS));
        if let Some(domain) = distracted {
            nudges.push(Nudge::Procrastination { domain });
        }
    }

    nudges
}
