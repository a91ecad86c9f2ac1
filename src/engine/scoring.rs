use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::content::PageSignals;
use crate::engine::config::ClassifierConfig;
use crate::models::{ActivityRecord, Category, UserPreferences};
use crate::rules::builtin::{self, domain_in, keyword_hits};
use crate::utils::time::is_work_hours;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryScores {
    pub priority: f64,
    pub timesink: f64,
    pub research: f64,
    pub zombie: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Priority => self.priority,
            Category::Timesink => self.timesink,
            Category::Research => self.research,
            Category::Zombie => self.zombie,
            Category::Unknown => 0.0,
        }
    }

    fn add(&mut self, category: Category, amount: f64) {
        match category {
            Category::Priority => self.priority += amount,
            Category::Timesink => self.timesink += amount,
            Category::Research => self.research += amount,
            Category::Zombie => self.zombie += amount,
            Category::Unknown => {}
        }
    }
}

pub struct ScoringInput<'a> {
    /// Rule domain (hostname without leading `www.`)
    pub domain: &'a str,
    pub title_lower: &'a str,
    pub activity: Option<&'a ActivityRecord>,
    pub signals: Option<&'a PageSignals>,
    pub preferences: &'a UserPreferences,
    pub now: &'a DateTime<FixedOffset>,
}

/// Additive keyword/domain/structure/behaviour scoring followed by time-of-day multipliers.
pub fn compute_scores(input: &ScoringInput<'_>, config: &ClassifierConfig) -> CategoryScores {
    let mut scores = CategoryScores::default();

    let source = input
        .signals
        .map(|signals| signals.text.as_str())
        .unwrap_or(input.title_lower);
    let text = format!("{} {}", source, input.domain);

    if domain_in(input.domain, builtin::PRIORITY_DOMAINS) {
        scores.priority += config.priority_domain_bonus;
    }
    if domain_in(input.domain, builtin::TIMESINK_DOMAINS) {
        scores.timesink += config.timesink_domain_bonus;
    }
    if domain_in(input.domain, builtin::RESEARCH_DOMAINS) {
        scores.research += config.research_domain_bonus;
    }

    for category in Category::ASSIGNABLE {
        let hits = keyword_hits(&text, builtin::keywords(category));
        scores.add(category, hits as f64);
    }

    if let Some(signals) = input.signals {
        apply_structural_bonuses(&mut scores, signals, input.preferences, config);
    }

    if let Some(activity) = input.activity {
        if activity.active_time_ms > config.long_session_ms && scores.timesink > 0.0 {
            scores.timesink += config.long_session_bonus;
        }
        if activity.visit_count > config.frequent_visit_count && scores.priority > 0.0 {
            scores.priority += config.frequent_visit_bonus;
        }
    }

    if input.preferences.use_work_hours {
        if is_work_hours(input.now, config.work_day_start_hour, config.work_day_end_hour) {
            scores.priority *= config.work_hours_priority_multiplier;
            scores.timesink *= config.work_hours_timesink_multiplier;
        } else {
            scores.timesink *= config.off_hours_timesink_multiplier;
            scores.research *= config.off_hours_research_multiplier;
        }
    }

    scores
}

fn apply_structural_bonuses(
    scores: &mut CategoryScores,
    signals: &PageSignals,
    preferences: &UserPreferences,
    config: &ClassifierConfig,
) {
    if signals.has_code_blocks {
        scores.priority += config.code_block_bonus;
    }
    if signals.has_video {
        scores.timesink += config.video_bonus;
    }
    if signals.has_comments {
        scores.timesink += config.comments_bonus;
    }
    if signals.has_shopping_elements && preferences.treat_shopping_as_useless {
        scores.timesink += config.shopping_bonus;
    }
    if signals.heading_count > config.many_headings {
        scores.research += config.headings_bonus;
    }
    if let Some(hint) = signals.path_hint {
        scores.add(hint, config.path_hint_bonus);
    }
}

/// Threshold decision: priority, then timesink, then research.
pub fn decide(scores: &CategoryScores, config: &ClassifierConfig) -> Option<Category> {
    if scores.priority >= config.priority_threshold {
        Some(Category::Priority)
    } else if scores.timesink >= config.timesink_threshold {
        Some(Category::Timesink)
    } else if scores.research >= config.research_threshold {
        Some(Category::Research)
    } else {
        None
    }
}
