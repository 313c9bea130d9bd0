//! Heuristic stream-URL extraction from arbitrary HTML.
//!
//! Five independent passes over a parsed document, unioned and
//! deduplicated:
//!
//! 1. `<video>` / `<video><source>` `src` (falling back to `data-src`)
//! 2. anchors whose href ends in a known media extension
//! 3. anchors whose visible text mentions play/stream/download
//!    (high recall, low precision - non-media links slip through)
//! 4. `<iframe src>` values
//! 5. absolute media URLs inside inline `<script>` text
//!
//! Everything found is resolved against the page URL. Malformed HTML
//! never errors; the parser degrades and the passes simply find less.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

static VIDEO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("video, video source").expect("valid selector"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static IFRAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("iframe[src]").expect("valid selector"));
static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("valid selector"));

/// Href ends in a media container extension, query string allowed.
static MEDIA_EXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:m3u8|mp4|mkv|mpd|webm)(?:\?.*)?$").expect("valid regex"));

/// Absolute media URL embedded in inline script text (player configs).
static SCRIPT_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s'"]+\.(?:m3u8|mp4|mkv|mpd)(?:\?[^\s'"]*)?"#)
        .expect("valid regex")
});

const LINK_TEXT_HINTS: &[&str] = &["play", "stream", "download"];

/// Run all five extraction passes over `html`.
///
/// Returned URLs are absolute where resolution against `page_url`
/// succeeded, deduplicated in first-seen order.
pub fn extract_streams(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();
    let mut found = UrlSet::new();

    // Pass 1: video elements and their <source> children.
    for element in document.select(&VIDEO_SELECTOR) {
        let src = element
            .value()
            .attr("src")
            .or_else(|| element.value().attr("data-src"));
        if let Some(src) = src {
            found.add(resolve_url(src, base.as_ref()));
        }
    }

    // Passes 2 and 3: anchors by extension and by link text.
    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        if MEDIA_EXT_RE.is_match(href) {
            found.add(resolve_url(href, base.as_ref()));
        }
        let text = element.text().collect::<String>().to_lowercase();
        if LINK_TEXT_HINTS.iter().any(|hint| text.contains(hint)) {
            found.add(resolve_url(href, base.as_ref()));
        }
    }

    // Pass 4: iframe embeds.
    for element in document.select(&IFRAME_SELECTOR) {
        if let Some(src) = element.value().attr("src") {
            found.add(resolve_url(src, base.as_ref()));
        }
    }

    // Pass 5: media URLs buried in inline script text.
    for element in document.select(&SCRIPT_SELECTOR) {
        let script = element.text().collect::<String>();
        for m in SCRIPT_URL_RE.find_iter(&script) {
            found.add(m.as_str().to_string());
        }
    }

    found.into_vec()
}

/// Collect resolved `<iframe src>` values from `html`.
pub fn iframe_sources(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();
    let mut found = UrlSet::new();
    for element in document.select(&IFRAME_SELECTOR) {
        if let Some(src) = element.value().attr("src") {
            found.add(resolve_url(src, base.as_ref()));
        }
    }
    found.into_vec()
}

/// Resolve `raw` against `base`, returning `raw` unchanged when it is
/// already absolute or cannot be resolved.
pub fn resolve_url(raw: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) => base
            .join(raw)
            .map_or_else(|_| raw.to_string(), |u| u.to_string()),
        None => Url::parse(raw).map_or_else(|_| raw.to_string(), |u| u.to_string()),
    }
}

/// Insertion-ordered string set.
struct UrlSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl UrlSet {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            ordered: Vec::new(),
        }
    }

    fn add(&mut self, url: String) {
        if !url.is_empty() && self.seen.insert(url.clone()) {
            self.ordered.push(url);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_src_resolves_relative() {
        let html = r#"<html><body><video src="/x.mp4"></video></body></html>"#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(urls, vec!["https://site/x.mp4"]);
    }

    #[test]
    fn video_source_child_and_data_src() {
        let html = r#"
            <video>
                <source data-src="/stream/a.m3u8">
            </video>
        "#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(urls, vec!["https://site/stream/a.m3u8"]);
    }

    #[test]
    fn anchor_with_media_extension() {
        let html = r#"<a href="movie.mkv?token=abc">file</a>"#;
        let urls = extract_streams(html, "https://site/dir/page");
        assert_eq!(urls, vec!["https://site/dir/movie.mkv?token=abc"]);
    }

    #[test]
    fn anchor_extension_is_case_insensitive() {
        let html = r#"<a href="/clip.MP4">file</a>"#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(urls, vec!["https://site/clip.MP4"]);
    }

    #[test]
    fn anchor_by_link_text() {
        let html = r#"<a href="/go/123">Download now</a>"#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(urls, vec!["https://site/go/123"]);
    }

    #[test]
    fn anchor_without_hints_is_ignored() {
        let html = r#"<a href="/about">About us</a>"#;
        let urls = extract_streams(html, "https://site/page");
        assert!(urls.is_empty());
    }

    #[test]
    fn iframe_src_is_collected() {
        let html = r#"<iframe src="//player.example/embed/9"></iframe>"#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(urls, vec!["https://player.example/embed/9"]);
    }

    #[test]
    fn inline_script_urls() {
        let html = r#"
            <script>
                var player = {file: "https://cdn.example/v/720.m3u8?sig=x"};
                var alt = 'https://cdn.example/v/fallback.mp4';
            </script>
        "#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(
            urls,
            vec![
                "https://cdn.example/v/720.m3u8?sig=x",
                "https://cdn.example/v/fallback.mp4",
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let html = r#"
            <a href="/x.mp4">watch</a>
            <video src="/x.mp4"></video>
        "#;
        let urls = extract_streams(html, "https://site/page");
        assert_eq!(urls, vec!["https://site/x.mp4"]);
    }

    #[test]
    fn malformed_html_yields_empty() {
        let urls = extract_streams("<<<>>>< not html at all", "https://site/page");
        assert!(urls.is_empty());
    }

    #[test]
    fn unparseable_page_url_keeps_raw_hrefs() {
        let html = r#"<a href="/x.mp4">clip</a>"#;
        let urls = extract_streams(html, "not a url");
        assert_eq!(urls, vec!["/x.mp4"]);
    }

    #[test]
    fn iframe_sources_only_reads_iframes() {
        let html = r#"
            <video src="/v.mp4"></video>
            <iframe src="/embed/1"></iframe>
            <iframe src="https://other.example/embed/2"></iframe>
        "#;
        let urls = iframe_sources(html, "https://site/page");
        assert_eq!(
            urls,
            vec!["https://site/embed/1", "https://other.example/embed/2"]
        );
    }

    #[test]
    fn resolve_url_passthrough_on_absolute() {
        let base = Url::parse("https://site/page").unwrap();
        assert_eq!(
            resolve_url("https://cdn.example/a.mp4", Some(&base)),
            "https://cdn.example/a.mp4"
        );
    }
}
