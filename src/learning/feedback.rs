use anyhow::{bail, Result};
use serde::Serialize;

use crate::{
    domain::{registrable_domain, rule_domain},
    models::Category,
    rules::{RuleSet, MAX_LEARNED_PATTERNS},
};

const MAX_TITLE_WORDS: usize = 3;
const MIN_WORD_CHARS: usize = 4;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutcome {
    pub domain_pattern: String,
    pub category: Category,
    /// Title words taken from this correction (before de-duplication).
    pub title_words: Vec<String>,
    /// Learned patterns evicted to stay under the per-category cap.
    pub evicted: usize,
}

/// Up to three lowercase title words longer than three characters, in title order.
pub fn significant_words(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() >= MIN_WORD_CHARS)
        .take(MAX_TITLE_WORDS)
        .map(str::to_string)
        .collect()
}

/// Turn a manual re-categorization into rule updates.
///
/// The registrable domain moves into `custom_rules[category]` and out of every
/// other category; the domain and the significant title words are appended to
/// `learned_patterns[category]`, which is then trimmed to its newest entries.
pub fn apply_feedback(
    rules: &mut RuleSet,
    url: &str,
    title: Option<&str>,
    category: Category,
) -> Result<FeedbackOutcome> {
    if !category.is_assignable() {
        bail!("cannot assign tabs to the '{category}' category");
    }

    let domain_pattern = registrable_domain(&rule_domain(url)?);

    for other in Category::ASSIGNABLE.iter().filter(|c| **c != category) {
        if let Some(list) = rules.custom_rules.get_mut(*other) {
            list.retain(|pattern| pattern != &domain_pattern);
        }
    }
    if let Some(list) = rules.custom_rules.get_mut(category) {
        push_unique(list, &domain_pattern);
    }

    let title_words = title.map(significant_words).unwrap_or_default();
    let mut evicted = 0;
    if let Some(list) = rules.learned_patterns.get_mut(category) {
        push_unique(list, &domain_pattern);
        for word in &title_words {
            push_unique(list, word);
        }
        if list.len() > MAX_LEARNED_PATTERNS {
            evicted = list.len() - MAX_LEARNED_PATTERNS;
            list.drain(..evicted);
        }
    }

    Ok(FeedbackOutcome {
        domain_pattern,
        category,
        title_words,
        evicted,
    })
}

fn push_unique(list: &mut Vec<String>, pattern: &str) {
    if !list.iter().any(|existing| existing == pattern) {
        list.push(pattern.to_string());
    }
}
