//! Behavioural tab categories and the per-category containers built on them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::tab::{Tab, TabId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Priority,
    Timesink,
    Research,
    Zombie,
    Unknown,
}

impl Category {
    /// Categories a user or a rule can assign, in rule-precedence order.
    pub const ASSIGNABLE: [Category; 4] = [
        Category::Priority,
        Category::Timesink,
        Category::Research,
        Category::Zombie,
    ];

    pub const ALL: [Category; 5] = [
        Category::Priority,
        Category::Timesink,
        Category::Research,
        Category::Zombie,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Priority => "priority",
            Category::Timesink => "timesink",
            Category::Research => "research",
            Category::Zombie => "zombie",
            Category::Unknown => "unknown",
        }
    }

    pub fn is_assignable(&self) -> bool {
        !matches!(self, Category::Unknown)
    }

    /// Projection onto the two-bucket view of the basic variant.
    pub fn to_legacy(&self) -> LegacyCategory {
        match self {
            Category::Priority | Category::Research => LegacyCategory::Important,
            Category::Timesink | Category::Zombie => LegacyCategory::Useless,
            Category::Unknown => LegacyCategory::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Category::Priority),
            "timesink" => Ok(Category::Timesink),
            "research" => Ok(Category::Research),
            "zombie" => Ok(Category::Zombie),
            "unknown" => Ok(Category::Unknown),
            other => Err(anyhow!("unknown category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegacyCategory {
    Important,
    Useless,
    Unknown,
}

/// Tabs grouped by category. Every category is always present, possibly empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorizedTabs {
    buckets: BTreeMap<Category, Vec<Tab>>,
}

impl Default for CategorizedTabs {
    fn default() -> Self {
        Self {
            buckets: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }
}

impl CategorizedTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, tab: Tab) {
        self.buckets.entry(category).or_default().push(tab);
    }

    pub fn get(&self, category: Category) -> &[Tab] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn ids(&self, category: Category) -> Vec<TabId> {
        self.get(category).iter().map(|tab| tab.id).collect()
    }

    pub fn count(&self, category: Category) -> usize {
        self.get(category).len()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Tab)> {
        self.buckets
            .iter()
            .flat_map(|(category, tabs)| tabs.iter().map(move |tab| (*category, tab)))
    }
}

/// Milliseconds of active time per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CategoryTotals {
    pub priority: u64,
    pub timesink: u64,
    pub research: u64,
    pub zombie: u64,
    pub unknown: u64,
}

impl CategoryTotals {
    pub fn add(&mut self, category: Category, ms: u64) {
        let slot = match category {
            Category::Priority => &mut self.priority,
            Category::Timesink => &mut self.timesink,
            Category::Research => &mut self.research,
            Category::Zombie => &mut self.zombie,
            Category::Unknown => &mut self.unknown,
        };
        *slot = slot.saturating_add(ms);
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Priority => self.priority,
            Category::Timesink => self.timesink,
            Category::Research => self.research,
            Category::Zombie => self.zombie,
            Category::Unknown => self.unknown,
        }
    }
}
