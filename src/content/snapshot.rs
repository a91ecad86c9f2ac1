//! Lightweight markup scan of a rendered page.
//!
//! This is not an HTML parser: it pattern-matches the handful of tags and
//! attributes the classifier cares about and tolerates malformed input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-4](?:\s[^>]*)?>(.*?)</h[1-4]>").expect("static regex"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").expect("static regex"));
static META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("static regex"));
static META_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bname\s*=\s*["']([^"']*)["']"#).expect("static regex"));
static META_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bcontent\s*=\s*["']([^"']*)["']"#).expect("static regex"));
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bclass\s*=\s*["']([^"']*)["']"#).expect("static regex"));
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bid\s*=\s*["']([^"']*)["']"#).expect("static regex"));
static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<iframe\s[^>]*src\s*=\s*["'][^"']*(?:youtube|vimeo)"#).expect("static regex")
});
static CODE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:pre|code)[\s>]").expect("static regex"));
static VIDEO_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<video[\s>]").expect("static regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// What the content extractor needs from a page, independent of how it was captured.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSnapshot {
    pub title: String,
    pub headings: Vec<String>,
    pub meta_description: String,
    pub meta_keywords: String,
    pub first_paragraph: String,
    pub has_video: bool,
    pub has_code_blocks: bool,
    pub has_comments: bool,
    pub has_shopping_elements: bool,
}

impl PageSnapshot {
    pub fn from_html(html: &str) -> Self {
        let title = TITLE_RE
            .captures(html)
            .map(|caps| visible_text(&caps[1]))
            .unwrap_or_default();

        let headings: Vec<String> = HEADING_RE
            .captures_iter(html)
            .map(|caps| visible_text(&caps[1]))
            .filter(|text| !text.is_empty())
            .collect();

        let first_paragraph = PARAGRAPH_RE
            .captures(html)
            .map(|caps| visible_text(&caps[1]))
            .unwrap_or_default();

        let mut meta_description = String::new();
        let mut meta_keywords = String::new();
        for tag in META_RE.find_iter(html) {
            let tag = tag.as_str();
            let name = capture(&META_NAME_RE, tag).to_ascii_lowercase();
            let content = capture(&META_CONTENT_RE, tag);
            match name.as_str() {
                "description" if meta_description.is_empty() => meta_description = content,
                "keywords" if meta_keywords.is_empty() => meta_keywords = content,
                _ => {}
            }
        }

        let classes = attribute_values(&CLASS_RE, html);
        let ids = attribute_values(&ID_RE, html);

        let has_video = VIDEO_TAG_RE.is_match(html) || EMBED_RE.is_match(html);
        let has_code_blocks = CODE_TAG_RE.is_match(html)
            || classes
                .iter()
                .any(|value| value.split_whitespace().any(|class| class == "highlight"));
        let has_comments = classes
            .iter()
            .chain(ids.iter())
            .any(|value| value.contains("comment"));
        let has_shopping_elements = classes
            .iter()
            .any(|value| ["cart", "price", "buy"].iter().any(|marker| value.contains(marker)));

        Self {
            title,
            headings,
            meta_description,
            meta_keywords,
            first_paragraph,
            has_video,
            has_code_blocks,
            has_comments,
            has_shopping_elements,
        }
    }
}

fn capture(re: &Regex, haystack: &str) -> String {
    re.captures(haystack)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

fn attribute_values(re: &Regex, html: &str) -> Vec<String> {
    re.captures_iter(html)
        .map(|caps| caps[1].to_ascii_lowercase())
        .collect()
}

fn visible_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    SPACE_RE.replace_all(stripped.trim(), " ").into_owned()
}
