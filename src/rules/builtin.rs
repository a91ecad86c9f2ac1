//! Built-in keyword and domain tables (lowest rule precedence).

use crate::models::Category;

pub const PRIORITY_DOMAINS: &[&str] = &[
    "gmail.com",
    "github.com",
    "docs.google.com",
    "notion.so",
    "slack.com",
    "trello.com",
    "asana.com",
    "jira.atlassian.com",
    "confluence.atlassian.com",
    "stackoverflow.com",
    "developer.mozilla.org",
    "aws.amazon.com",
];

pub const PRIORITY_KEYWORDS: &[&str] = &[
    "documentation",
    "docs",
    "api",
    "tutorial",
    "guide",
    "learn",
    "course",
    "admin",
    "dashboard",
    "analytics",
    "report",
    "meeting",
    "calendar",
    "email",
    "work",
    "project",
    "task",
    "deadline",
    "urgent",
    "important",
];

pub const TIMESINK_DOMAINS: &[&str] = &[
    "youtube.com",
    "netflix.com",
    "reddit.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "twitch.tv",
    "discord.com",
    "pinterest.com",
    "linkedin.com",
];

pub const TIMESINK_KEYWORDS: &[&str] = &[
    "video",
    "watch",
    "stream",
    "funny",
    "meme",
    "entertainment",
    "social",
    "game",
    "gaming",
    "music",
    "podcast",
    "celebrity",
    "gossip",
    "viral",
];

pub const RESEARCH_DOMAINS: &[&str] = &[
    "medium.com",
    "dev.to",
    "hackernoon.com",
    "techcrunch.com",
    "wired.com",
    "arstechnica.com",
    "theverge.com",
    "wikipedia.org",
    "arxiv.org",
];

pub const RESEARCH_KEYWORDS: &[&str] = &[
    "article",
    "blog",
    "news",
    "research",
    "study",
    "paper",
    "pdf",
    "how to",
    "tutorial",
    "guide",
    "tips",
    "best practices",
    "review",
];

pub const ZOMBIE_KEYWORDS: &[&str] = &[
    "temporary",
    "temp",
    "test",
    "demo",
    "example",
    "placeholder",
    "coming soon",
    "under construction",
    "maintenance",
    "error",
    "404",
    "not found",
    "expired",
    "deprecated",
];

/// Unambiguous domains consulted after scoring, in this order.
pub const FALLBACK_DOMAINS: &[(Category, &[&str])] = &[
    (
        Category::Timesink,
        &[
            "youtube.com",
            "facebook.com",
            "instagram.com",
            "twitter.com",
            "x.com",
            "tiktok.com",
        ],
    ),
    (
        Category::Priority,
        &["github.com", "stackoverflow.com", "docs.google.com", "gmail.com"],
    ),
    (Category::Research, &["wikipedia.org", "medium.com", "dev.to"]),
];

pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "reddit.com",
];

pub const PROCRASTINATION_DOMAINS: &[&str] = &[
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "reddit.com",
    "tiktok.com",
    "netflix.com",
    "twitch.tv",
];

pub fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Priority => PRIORITY_KEYWORDS,
        Category::Timesink => TIMESINK_KEYWORDS,
        Category::Research => RESEARCH_KEYWORDS,
        Category::Zombie => ZOMBIE_KEYWORDS,
        Category::Unknown => &[],
    }
}

pub fn domains(category: Category) -> &'static [&'static str] {
    match category {
        Category::Priority => PRIORITY_DOMAINS,
        Category::Timesink => TIMESINK_DOMAINS,
        Category::Research => RESEARCH_DOMAINS,
        Category::Zombie | Category::Unknown => &[],
    }
}

/// Substring membership against any entry of `table`.
pub fn domain_in(domain: &str, table: &[&str]) -> bool {
    table.iter().any(|entry| domain.contains(entry))
}

/// Number of distinct `table` entries occurring in `text`.
pub fn keyword_hits(text: &str, table: &[&str]) -> usize {
    table.iter().filter(|keyword| text.contains(*keyword)).count()
}

pub fn fallback_category(domain: &str) -> Option<Category> {
    FALLBACK_DOMAINS
        .iter()
        .find(|(_, table)| domain_in(domain, table))
        .map(|(category, _)| *category)
}
