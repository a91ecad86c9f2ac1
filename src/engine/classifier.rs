use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use super::config::ClassifierConfig;
use super::scoring::{compute_scores, decide, CategoryScores, ScoringInput};
use crate::content::PageSignals;
use crate::domain::rule_domain;
use crate::models::{ActivityRecord, Category, LegacyCategory, Tab, UserPreferences};
use crate::rules::{builtin, RuleSet};
use crate::utils::time::days_between;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = false;

/// Everything a single classification reads besides the tab itself.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationContext<'a> {
    pub activity: Option<&'a ActivityRecord>,
    pub rules: &'a RuleSet,
    pub preferences: &'a UserPreferences,
    pub signals: Option<&'a PageSignals>,
    pub now: DateTime<FixedOffset>,
}

/// Which tier of the cascade produced the category.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Basis {
    Malformed { reason: String },
    Stale { days_since_access: f64 },
    CustomRule { pattern: String },
    LearnedPattern { pattern: String },
    Heuristic { scores: CategoryScores },
    DomainFallback,
    Unmatched { scores: CategoryScores },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub basis: Basis,
}

impl Classification {
    pub fn legacy(&self) -> LegacyCategory {
        self.category.to_legacy()
    }
}

/// Pure decision procedure: no I/O, no hidden state.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, tab: &Tab, ctx: &ClassificationContext<'_>) -> Category {
        self.evaluate(tab, ctx).category
    }

    /// Run the cascade: malformed, staleness, custom rules, learned patterns,
    /// heuristic scores, domain fallback. First match wins.
    pub fn evaluate(&self, tab: &Tab, ctx: &ClassificationContext<'_>) -> Classification {
        let (domain, title) = match parse_tab(tab) {
            Ok(parsed) => parsed,
            Err(reason) => {
                log_warn!("tab {} is malformed ({}), classifying as unknown", tab.id, reason);
                return Classification {
                    category: Category::Unknown,
                    basis: Basis::Malformed { reason },
                };
            }
        };

        if self.config.staleness_enabled {
            if let Some(activity) = ctx.activity {
                let days = days_between(activity.last_accessed, ctx.now.with_timezone(&Utc));
                if days > self.config.zombie_threshold_days {
                    return Classification {
                        category: Category::Zombie,
                        basis: Basis::Stale {
                            days_since_access: days,
                        },
                    };
                }
            }
        }

        if let Some((category, pattern)) = ctx.rules.match_custom(&domain) {
            return Classification {
                category,
                basis: Basis::CustomRule {
                    pattern: pattern.to_string(),
                },
            };
        }

        let title_lower = title.to_lowercase();
        if let Some((category, pattern)) = ctx.rules.match_learned(&domain, &title_lower) {
            return Classification {
                category,
                basis: Basis::LearnedPattern {
                    pattern: pattern.to_string(),
                },
            };
        }

        let scores = compute_scores(
            &ScoringInput {
                domain: &domain,
                title_lower: &title_lower,
                activity: ctx.activity,
                signals: ctx.signals,
                preferences: ctx.preferences,
                now: &ctx.now,
            },
            &self.config,
        );
        if let Some(category) = decide(&scores, &self.config) {
            return Classification {
                category,
                basis: Basis::Heuristic { scores },
            };
        }

        if let Some(category) = builtin::fallback_category(&domain) {
            return Classification {
                category,
                basis: Basis::DomainFallback,
            };
        }

        log_info!("tab {} ({}) matched no tier", tab.id, domain);
        Classification {
            category: Category::Unknown,
            basis: Basis::Unmatched { scores },
        }
    }

    /// Heuristic scores alone, bypassing every rule tier. `None` for malformed tabs.
    pub fn score(&self, tab: &Tab, ctx: &ClassificationContext<'_>) -> Option<CategoryScores> {
        let (domain, title) = parse_tab(tab).ok()?;
        let title_lower = title.to_lowercase();
        Some(compute_scores(
            &ScoringInput {
                domain: &domain,
                title_lower: &title_lower,
                activity: ctx.activity,
                signals: ctx.signals,
                preferences: ctx.preferences,
                now: &ctx.now,
            },
            &self.config,
        ))
    }
}

fn parse_tab(tab: &Tab) -> Result<(String, &str), String> {
    let title = tab
        .title
        .as_deref()
        .ok_or_else(|| "missing title".to_string())?;
    let domain = rule_domain(&tab.url).map_err(|err| err.to_string())?;
    Ok((domain, title))
}
