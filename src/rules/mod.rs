//! Layered rule sets: explicit user rules, learned patterns, built-in tables.

pub mod builtin;
mod store;

use serde::{Deserialize, Serialize};

use crate::models::Category;

pub use store::RuleStore;

/// Maximum learned patterns kept per category; oldest are evicted first.
pub const MAX_LEARNED_PATTERNS: usize = 50;

/// Pattern lists keyed by assignable category, in the stored JSON shape
/// `{ "priority": [...], "timesink": [...], "research": [...], "zombie": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PatternTable {
    pub priority: Vec<String>,
    pub timesink: Vec<String>,
    pub research: Vec<String>,
    pub zombie: Vec<String>,
}

impl PatternTable {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Priority => &self.priority,
            Category::Timesink => &self.timesink,
            Category::Research => &self.research,
            Category::Zombie => &self.zombie,
            Category::Unknown => &[],
        }
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut Vec<String>> {
        match category {
            Category::Priority => Some(&mut self.priority),
            Category::Timesink => Some(&mut self.timesink),
            Category::Research => Some(&mut self.research),
            Category::Zombie => Some(&mut self.zombie),
            Category::Unknown => None,
        }
    }

    /// Categories whose list contains `pattern` exactly.
    pub fn categories_of(&self, pattern: &str) -> Vec<Category> {
        Category::ASSIGNABLE
            .iter()
            .copied()
            .filter(|category| self.get(*category).iter().any(|p| p == pattern))
            .collect()
    }

    /// First category, in precedence order, with a pattern accepted by `matches`.
    fn find<'a, F>(&'a self, matches: F) -> Option<(Category, &'a str)>
    where
        F: Fn(&str) -> bool,
    {
        Category::ASSIGNABLE.iter().find_map(|category| {
            self.get(*category)
                .iter()
                .find(|pattern| !pattern.is_empty() && matches(pattern.as_str()))
                .map(|pattern| (*category, pattern.as_str()))
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    pub custom_rules: PatternTable,
    pub learned_patterns: PatternTable,
}

impl RuleSet {
    /// Custom rule whose pattern is a substring of `domain`.
    pub fn match_custom(&self, domain: &str) -> Option<(Category, &str)> {
        self.custom_rules.find(|pattern| domain.contains(pattern))
    }

    /// Learned pattern contained in `domain` or in the lowercased title.
    pub fn match_learned(&self, domain: &str, title_lower: &str) -> Option<(Category, &str)> {
        self.learned_patterns
            .find(|pattern| domain.contains(pattern) || title_lower.contains(pattern))
    }
}
