use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use tabwarden_lib::content::{extract_signals, PageSnapshot};
use tabwarden_lib::{
    ActivityRecord, Basis, Category, ClassificationContext, Classifier, ClassifierConfig,
    LegacyCategory, RuleSet, Tab, UserPreferences,
};

// 2024-01-09 is a Tuesday, 2024-01-10 a Wednesday.
fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, day, hour, 0, 0)
        .unwrap()
}

fn accessed_days_ago(now: DateTime<FixedOffset>, days: i64) -> ActivityRecord {
    let when = now.with_timezone(&Utc) - Duration::days(days);
    ActivityRecord::first_observed(when)
}

fn ctx<'a>(
    rules: &'a RuleSet,
    prefs: &'a UserPreferences,
    activity: Option<&'a ActivityRecord>,
    now: DateTime<FixedOffset>,
) -> ClassificationContext<'a> {
    ClassificationContext {
        activity,
        rules,
        preferences: prefs,
        signals: None,
        now,
    }
}

#[test]
fn github_pull_request_is_priority_on_tuesday_morning() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let tab = Tab::new(1, "https://github.com/org/repo", "Pull Request #42");

    let result = Classifier::default().evaluate(&tab, &ctx(&rules, &prefs, None, at(9, 10)));
    assert_eq!(result.category, Category::Priority);
    assert!(matches!(result.basis, Basis::Heuristic { .. }));
}

#[test]
fn youtube_cat_video_is_timesink_at_night() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let tab = Tab::new(2, "https://youtube.com/watch?v=x", "Funny cat video");

    let classifier = Classifier::default();
    let context = ctx(&rules, &prefs, None, at(10, 22));
    assert_eq!(classifier.classify(&tab, &context), Category::Timesink);

    // domain +3, "funny" and "video" +1 each, evening x1.3
    let scores = classifier.score(&tab, &context).unwrap();
    assert!((scores.timesink - 6.5).abs() < 1e-9, "got {}", scores.timesink);
}

#[test]
fn ten_days_without_access_is_zombie_regardless_of_content() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let now = at(9, 10);
    let record = accessed_days_ago(now, 10);
    let tab = Tab::new(3, "https://github.com/org/repo", "Urgent deadline project meeting");

    let result = Classifier::default().evaluate(&tab, &ctx(&rules, &prefs, Some(&record), now));
    assert_eq!(result.category, Category::Zombie);
    match result.basis {
        Basis::Stale { days_since_access } => assert!((days_since_access - 10.0).abs() < 1e-9),
        other => panic!("expected stale basis, got {other:?}"),
    }
}

#[test]
fn staleness_overrides_custom_rule() {
    let mut rules = RuleSet::default();
    rules.custom_rules.priority.push("github.com".into());
    let prefs = UserPreferences::default();
    let now = at(9, 10);
    let record = accessed_days_ago(now, 8);
    let tab = Tab::new(4, "https://github.com/org/repo", "Issues");

    let classifier = Classifier::default();
    assert_eq!(
        classifier.classify(&tab, &ctx(&rules, &prefs, Some(&record), now)),
        Category::Zombie
    );

    let fresh = accessed_days_ago(now, 6);
    assert_eq!(
        classifier.classify(&tab, &ctx(&rules, &prefs, Some(&fresh), now)),
        Category::Priority
    );
}

#[test]
fn basic_config_has_no_staleness_override() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let now = at(9, 10);
    let record = accessed_days_ago(now, 30);
    let tab = Tab::new(5, "https://github.com/org/repo", "Pull Request #42");

    let classifier = Classifier::new(ClassifierConfig::basic());
    let classification = classifier.evaluate(&tab, &ctx(&rules, &prefs, Some(&record), now));
    assert_eq!(classification.category, Category::Priority);
    assert_eq!(classification.legacy(), LegacyCategory::Important);
}

#[test]
fn custom_rule_matches_domain_without_www() {
    let mut rules = RuleSet::default();
    rules.custom_rules.research.push("news.ycombinator.com".into());
    let prefs = UserPreferences::default();
    let tab = Tab::new(6, "https://www.news.ycombinator.com/item?id=1", "Show HN");

    let result = Classifier::default().evaluate(&tab, &ctx(&rules, &prefs, None, at(10, 12)));
    assert_eq!(result.category, Category::Research);
    assert_eq!(
        result.basis,
        Basis::CustomRule {
            pattern: "news.ycombinator.com".into()
        }
    );
}

#[test]
fn custom_rules_beat_learned_patterns() {
    let mut rules = RuleSet::default();
    rules.custom_rules.timesink.push("plain.org".into());
    rules.learned_patterns.priority.push("plain.org".into());
    let prefs = UserPreferences::default();
    let tab = Tab::new(7, "https://plain.org/", "Hello there");

    let result = Classifier::default().classify(&tab, &ctx(&rules, &prefs, None, at(10, 12)));
    assert_eq!(result, Category::Timesink);
}

#[test]
fn learned_patterns_match_title_and_earlier_category_wins() {
    let mut rules = RuleSet::default();
    rules.learned_patterns.research.push("kubernetes".into());
    rules.learned_patterns.timesink.push("kubernetes".into());
    let prefs = UserPreferences::default();
    let tab = Tab::new(8, "https://plain.org/", "Kubernetes operators explained");

    let result = Classifier::default().evaluate(&tab, &ctx(&rules, &prefs, None, at(10, 12)));
    assert_eq!(result.category, Category::Timesink);
    assert_eq!(
        result.basis,
        Basis::LearnedPattern {
            pattern: "kubernetes".into()
        }
    );
}

#[test]
fn domain_fallback_catches_damped_timesinks() {
    // Work hours damp the instagram domain bonus to 1.8, below threshold.
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let tab = Tab::new(9, "https://www.instagram.com/", "Home");

    let result = Classifier::default().evaluate(&tab, &ctx(&rules, &prefs, None, at(9, 10)));
    assert_eq!(result.category, Category::Timesink);
    assert_eq!(result.basis, Basis::DomainFallback);
}

#[test]
fn unmatched_tab_is_unknown() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let tab = Tab::new(10, "https://plain.org/", "Hello there");

    let result = Classifier::default().evaluate(&tab, &ctx(&rules, &prefs, None, at(10, 12)));
    assert_eq!(result.category, Category::Unknown);
    assert!(matches!(result.basis, Basis::Unmatched { .. }));
}

#[test]
fn malformed_tabs_degrade_to_unknown() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let now = at(9, 10);
    let stale = accessed_days_ago(now, 20);
    let classifier = Classifier::default();

    let bad_url = Tab::new(11, "not a url", "Pull Request #42");
    let result = classifier.evaluate(&bad_url, &ctx(&rules, &prefs, Some(&stale), now));
    assert_eq!(result.category, Category::Unknown);
    assert!(matches!(result.basis, Basis::Malformed { .. }));

    let no_title = Tab {
        id: 12,
        url: "https://github.com/org/repo".into(),
        title: None,
        active: false,
    };
    let result = classifier.evaluate(&no_title, &ctx(&rules, &prefs, None, now));
    assert_eq!(result.category, Category::Unknown);
    assert!(classifier.score(&no_title, &ctx(&rules, &prefs, None, now)).is_none());
}

#[test]
fn classification_is_idempotent() {
    let mut rules = RuleSet::default();
    rules.learned_patterns.research.push("rust".into());
    let prefs = UserPreferences::default();
    let tab = Tab::new(13, "https://blog.example.net/post", "Learning Rust generics");
    let classifier = Classifier::default();
    let context = ctx(&rules, &prefs, None, at(10, 15));

    let first = classifier.evaluate(&tab, &context);
    let second = classifier.evaluate(&tab, &context);
    assert_eq!(first, second);
}

#[test]
fn work_hours_never_lower_priority_score() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let tab = Tab::new(14, "https://docs.google.com/document/d/1", "Project deadline report");
    let classifier = Classifier::default();

    let morning = classifier.score(&tab, &ctx(&rules, &prefs, None, at(10, 10))).unwrap();
    let night = classifier.score(&tab, &ctx(&rules, &prefs, None, at(10, 22))).unwrap();
    assert!(morning.priority >= night.priority);
    assert!(morning.priority > 0.0);
}

#[test]
fn disabling_work_hours_leaves_scores_unmodulated() {
    let rules = RuleSet::default();
    let prefs = UserPreferences {
        use_work_hours: false,
        ..UserPreferences::default()
    };
    let tab = Tab::new(15, "https://github.com/org/repo", "Pull Request #42");

    let scores = Classifier::default()
        .score(&tab, &ctx(&rules, &prefs, None, at(9, 10)))
        .unwrap();
    assert_eq!(scores.priority, 3.0);
}

#[test]
fn long_sessions_add_timesink_bonus_only_when_already_scoring() {
    let rules = RuleSet::default();
    let prefs = UserPreferences {
        use_work_hours: false,
        ..UserPreferences::default()
    };
    let now = at(10, 12);
    let mut record = accessed_days_ago(now, 0);
    record.active_time_ms = 700_000;
    let classifier = Classifier::default();

    let video = Tab::new(16, "https://youtube.com/watch?v=x", "Some clip");
    let without = classifier.score(&video, &ctx(&rules, &prefs, None, now)).unwrap();
    let with = classifier.score(&video, &ctx(&rules, &prefs, Some(&record), now)).unwrap();
    assert_eq!(with.timesink - without.timesink, 2.0);

    let plain = Tab::new(17, "https://plain.org/", "Hello there");
    let scores = classifier.score(&plain, &ctx(&rules, &prefs, Some(&record), now)).unwrap();
    assert_eq!(scores.timesink, 0.0);
}

#[test]
fn frequent_visits_boost_priority() {
    let rules = RuleSet::default();
    let prefs = UserPreferences {
        use_work_hours: false,
        ..UserPreferences::default()
    };
    let now = at(10, 12);
    let mut record = accessed_days_ago(now, 0);
    record.visit_count = 6;
    let tab = Tab::new(18, "https://plain.org/", "Team meeting notes");

    let scores = Classifier::default()
        .score(&tab, &ctx(&rules, &prefs, Some(&record), now))
        .unwrap();
    assert_eq!(scores.priority, 2.0);
}

#[test]
fn page_signals_can_tip_the_decision() {
    let rules = RuleSet::default();
    let prefs = UserPreferences::default();
    let url = "https://internal.net/admin";
    let tab = Tab::new(19, url, "Async notes");
    let page = PageSnapshot {
        has_code_blocks: true,
        ..PageSnapshot::default()
    };
    let signals = extract_signals("Async notes", url, &page);
    let classifier = Classifier::default();
    let now = at(10, 22);

    assert_eq!(
        classifier.classify(&tab, &ctx(&rules, &prefs, None, now)),
        Category::Unknown
    );

    let enriched = ClassificationContext {
        signals: Some(&signals),
        ..ctx(&rules, &prefs, None, now)
    };
    assert_eq!(classifier.classify(&tab, &enriched), Category::Priority);
}

#[test]
fn shopping_bonus_follows_preference() {
    let rules = RuleSet::default();
    let url = "https://store.plain.org/item";
    let tab = Tab::new(20, url, "Item");
    let page = PageSnapshot {
        has_shopping_elements: true,
        ..PageSnapshot::default()
    };
    let signals = extract_signals("Item", url, &page);
    let classifier = Classifier::default();
    let now = at(10, 12);

    let on = UserPreferences {
        use_work_hours: false,
        ..UserPreferences::default()
    };
    let off = UserPreferences {
        treat_shopping_as_useless: false,
        ..on.clone()
    };

    let with_pref = ClassificationContext {
        signals: Some(&signals),
        ..ctx(&rules, &on, None, now)
    };
    let without_pref = ClassificationContext {
        signals: Some(&signals),
        ..ctx(&rules, &off, None, now)
    };
    assert_eq!(classifier.score(&tab, &with_pref).unwrap().timesink, 1.0);
    assert_eq!(classifier.score(&tab, &without_pref).unwrap().timesink, 0.0);
}

#[test]
fn legacy_projection() {
    assert_eq!(Category::Priority.to_legacy(), LegacyCategory::Important);
    assert_eq!(Category::Research.to_legacy(), LegacyCategory::Important);
    assert_eq!(Category::Timesink.to_legacy(), LegacyCategory::Useless);
    assert_eq!(Category::Zombie.to_legacy(), LegacyCategory::Useless);
    assert_eq!(Category::Unknown.to_legacy(), LegacyCategory::Unknown);
}
