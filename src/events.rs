//! Host events consumed by [`crate::TabManager::dispatch`].

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::models::TabId;

/// Named periodic triggers fired by the scheduler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Trigger {
    #[serde(rename = "weeklyZombieCleanup")]
    WeeklyZombieSweep,
    #[serde(rename = "dailyAnalyticsUpdate")]
    DailyStatsRefresh,
}

impl Trigger {
    pub fn alarm_name(&self) -> &'static str {
        match self {
            Trigger::WeeklyZombieSweep => "weeklyZombieCleanup",
            Trigger::DailyStatsRefresh => "dailyAnalyticsUpdate",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alarm_name())
    }
}

impl FromStr for Trigger {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "weeklyZombieCleanup" => Ok(Trigger::WeeklyZombieSweep),
            "dailyAnalyticsUpdate" => Ok(Trigger::DailyStatsRefresh),
            other => Err(anyhow!("unknown alarm '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    Activated {
        tab_id: TabId,
    },
    /// Navigation completed.
    Navigated {
        tab_id: TabId,
        url: String,
        title: Option<String>,
    },
    Closed {
        tab_id: TabId,
    },
    Alarm(Trigger),
}
