use crate::models::EngineSettings;

/// Tunable weights and thresholds for the classification cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Basic variant runs without the staleness override
    pub staleness_enabled: bool,
    pub zombie_threshold_days: f64,

    /// Work hours: weekdays, start inclusive, end exclusive
    pub work_day_start_hour: u32,
    pub work_day_end_hour: u32,
    pub work_hours_priority_multiplier: f64,
    pub work_hours_timesink_multiplier: f64,
    pub off_hours_timesink_multiplier: f64,
    pub off_hours_research_multiplier: f64,

    /// Decision thresholds, checked in this order
    pub priority_threshold: f64,
    pub timesink_threshold: f64,
    pub research_threshold: f64,

    /// Built-in domain table hits
    pub priority_domain_bonus: f64,
    pub timesink_domain_bonus: f64,
    pub research_domain_bonus: f64,

    /// Behavioural adjustments from the activity record
    pub long_session_ms: u64,
    pub long_session_bonus: f64,
    pub frequent_visit_count: u64,
    pub frequent_visit_bonus: f64,

    /// Structural bonuses from page signals
    pub code_block_bonus: f64,
    pub video_bonus: f64,
    pub comments_bonus: f64,
    pub shopping_bonus: f64,
    pub many_headings: usize,
    pub headings_bonus: f64,
    pub path_hint_bonus: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            staleness_enabled: true,
            zombie_threshold_days: 7.0,
            work_day_start_hour: 9,
            work_day_end_hour: 17,
            work_hours_priority_multiplier: 1.5,
            work_hours_timesink_multiplier: 0.6,
            off_hours_timesink_multiplier: 1.3,
            off_hours_research_multiplier: 1.2,
            priority_threshold: 3.0,
            timesink_threshold: 3.0,
            research_threshold: 2.0,
            priority_domain_bonus: 3.0,
            timesink_domain_bonus: 3.0,
            research_domain_bonus: 2.0,
            long_session_ms: 600_000,
            long_session_bonus: 2.0,
            frequent_visit_count: 5,
            frequent_visit_bonus: 1.0,
            code_block_bonus: 2.0,
            video_bonus: 2.0,
            comments_bonus: 1.0,
            shopping_bonus: 1.0,
            many_headings: 5,
            headings_bonus: 1.0,
            path_hint_bonus: 1.0,
        }
    }
}

impl ClassifierConfig {
    /// Reduced configuration of the two-bucket variant: no staleness override.
    pub fn basic() -> Self {
        Self {
            staleness_enabled: false,
            ..Self::default()
        }
    }

    /// Overlay persisted engine settings. Non-positive thresholds are ignored.
    pub fn with_settings(mut self, settings: &EngineSettings) -> Self {
        if settings.zombie_threshold_days.is_finite() && settings.zombie_threshold_days > 0.0 {
            self.zombie_threshold_days = settings.zombie_threshold_days;
        }
        self
    }
}
