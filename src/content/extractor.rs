use serde::Serialize;

use super::snapshot::PageSnapshot;
use crate::domain::url_path;
use crate::models::Category;

/// Leading body text kept for keyword matching.
pub const BODY_TEXT_LIMIT: usize = 500;

/// Feature summary of a page with full context available.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSignals {
    /// Lowercased title, headings, meta description/keywords and leading body text.
    pub text: String,
    pub heading_count: usize,
    pub has_video: bool,
    pub has_code_blocks: bool,
    pub has_comments: bool,
    pub has_shopping_elements: bool,
    /// Category implied by the URL path alone (`/admin`, `/watch`, `.pdf`, ...).
    pub path_hint: Option<Category>,
}

pub fn extract_signals(title: &str, url: &str, page: &PageSnapshot) -> PageSignals {
    let title = if title.trim().is_empty() {
        page.title.as_str()
    } else {
        title
    };
    let body: String = page.first_paragraph.chars().take(BODY_TEXT_LIMIT).collect();

    let headings = page.headings.join(" ");
    let text = [
        title,
        headings.as_str(),
        page.meta_description.as_str(),
        page.meta_keywords.as_str(),
        body.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    PageSignals {
        text,
        heading_count: page.headings.len(),
        has_video: page.has_video,
        has_code_blocks: page.has_code_blocks,
        has_comments: page.has_comments,
        has_shopping_elements: page.has_shopping_elements,
        path_hint: path_hint(url),
    }
}

/// URL-shape hint: path fragments first, then file extensions.
pub fn path_hint(url: &str) -> Option<Category> {
    let lowered = url.to_lowercase();
    let path = url_path(url);

    if lowered.contains("/admin") || lowered.contains("/dashboard") {
        return Some(Category::Priority);
    }
    if lowered.contains("/watch") || lowered.contains("/video") {
        return Some(Category::Timesink);
    }
    if lowered.contains("/article") || lowered.contains("/blog") {
        return Some(Category::Research);
    }
    if lowered.contains("/404") || lowered.contains("/error") {
        return Some(Category::Zombie);
    }

    if path.ends_with(".pdf") || path.ends_with(".doc") {
        return Some(Category::Research);
    }
    if path.ends_with(".mp4") || path.ends_with(".mp3") {
        return Some(Category::Timesink);
    }

    None
}
