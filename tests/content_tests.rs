use tabwarden_lib::content::{extract_signals, path_hint, PageSnapshot, BODY_TEXT_LIMIT};
use tabwarden_lib::Category;

const ARTICLE: &str = r#"
<html>
<head>
  <title>Understanding Lifetimes</title>
  <meta name="description" content="A deep dive into borrow checking">
  <meta name="keywords" content="rust, lifetimes, tutorial">
</head>
<body>
  <h1>Understanding <em>Lifetimes</em></h1>
  <h2 class="section">Elision</h2>
  <p>Lifetimes   describe how long references stay valid.</p>
  <p>Second paragraph.</p>
  <pre><code>fn longest&lt;'a&gt;()</code></pre>
  <div id="comments-section"></div>
</body>
</html>
"#;

#[test]
fn snapshot_reads_text_parts() {
    let page = PageSnapshot::from_html(ARTICLE);
    assert_eq!(page.title, "Understanding Lifetimes");
    assert_eq!(page.headings, vec!["Understanding Lifetimes", "Elision"]);
    assert_eq!(page.meta_description, "A deep dive into borrow checking");
    assert_eq!(page.meta_keywords, "rust, lifetimes, tutorial");
    assert_eq!(page.first_paragraph, "Lifetimes describe how long references stay valid.");
}

#[test]
fn snapshot_detects_structure() {
    let page = PageSnapshot::from_html(ARTICLE);
    assert!(page.has_code_blocks);
    assert!(page.has_comments);
    assert!(!page.has_video);
    assert!(!page.has_shopping_elements);

    let video = PageSnapshot::from_html(
        r#"<iframe width="560" src="https://www.youtube.com/embed/abc"></iframe>"#,
    );
    assert!(video.has_video);

    let shop = PageSnapshot::from_html(r#"<button class="btn add-to-cart">Buy</button>"#);
    assert!(shop.has_shopping_elements);

    let highlighted = PageSnapshot::from_html(r#"<div class="highlight rust">let x;</div>"#);
    assert!(highlighted.has_code_blocks);
}

#[test]
fn malformed_markup_does_not_panic() {
    let page = PageSnapshot::from_html("<h1>Unclosed <p>text <meta name=");
    assert!(page.headings.is_empty());
    assert!(page.title.is_empty());
}

#[test]
fn signals_concatenate_lowercase_text() {
    let page = PageSnapshot::from_html(ARTICLE);
    let signals = extract_signals("", "https://blog.rust.dev/article/lifetimes", &page);

    assert!(signals.text.starts_with("understanding lifetimes "));
    assert!(signals.text.contains("a deep dive into borrow checking"));
    assert!(signals.text.contains("references stay valid"));
    assert_eq!(signals.heading_count, 2);
    assert_eq!(signals.path_hint, Some(Category::Research));
}

#[test]
fn body_text_is_bounded() {
    let long = format!("<p>{}</p>", "x".repeat(2_000));
    let page = PageSnapshot::from_html(&long);
    let signals = extract_signals("T", "https://a.org", &page);
    let xs = signals.text.chars().filter(|c| *c == 'x').count();
    assert_eq!(xs, BODY_TEXT_LIMIT);
}

#[test]
fn path_hints() {
    assert_eq!(path_hint("https://a.org/admin/users"), Some(Category::Priority));
    assert_eq!(path_hint("https://a.org/dashboard"), Some(Category::Priority));
    assert_eq!(path_hint("https://a.org/watch?v=1"), Some(Category::Timesink));
    assert_eq!(path_hint("https://a.org/files/song.mp3"), Some(Category::Timesink));
    assert_eq!(path_hint("https://a.org/blog/post"), Some(Category::Research));
    assert_eq!(path_hint("https://a.org/paper.pdf"), Some(Category::Research));
    assert_eq!(path_hint("https://a.org/404"), Some(Category::Zombie));
    assert_eq!(path_hint("https://a.org/"), None);
}
