//! Provider for a.111477.xyz.
//!
//! The site has no structured API, so resolution is guesswork: build a
//! fixed list of likely page URLs for an identifier, fetch each in
//! order, and stop at the first page that yields any stream URL. A
//! search-page scrape is the last resort. Every failure along the way
//! is logged and degrades to "fewer results"; the public `resolve` and
//! `search` never surface an error.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::client::{FetchOptions, SiteClient};
use crate::error::{Result, ScrapeError};
use crate::extract::{self, resolve_url};
use crate::iframe;
use crate::normalize::{normalize, StreamDescriptor};
use crate::probe::{JsonProbe, NoopProbe};
use crate::provider::{CatalogEntry, MediaType, ResolveArgs, StreamProvider};

/// Origin all candidate and search URLs are rooted at.
pub const BASE: &str = "https://a.111477.xyz";

const PROVIDER_ID: &str = "a111477";

/// Search results usually sit in repeated content blocks.
static RESULT_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article, .post, .movie, .item, .result").expect("valid selector")
});
static BLOCK_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static BLOCK_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2, h3, .title").expect("valid selector"));

/// Scraping adapter for a.111477.xyz.
pub struct A111477Provider {
    client: SiteClient,
    probe: Box<dyn JsonProbe>,
}

impl A111477Provider {
    /// Provider against the live site with a fresh cache.
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(SiteClient::new(BASE)?))
    }

    /// Provider over an existing client (shared cache, test doubles).
    pub fn with_client(client: SiteClient) -> Self {
        Self {
            client,
            probe: Box::new(NoopProbe),
        }
    }

    /// Replace the no-op JSON player probe.
    pub fn with_probe(mut self, probe: Box<dyn JsonProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Strip the provider prefix and leading slashes from a raw id.
    ///
    /// Accepted shapes: `a111477:slug`, `a111477:/watch/slug`, `/slug`,
    /// `slug`.
    fn normalize_id(raw: &str) -> &str {
        raw.strip_prefix("a111477:")
            .unwrap_or(raw)
            .trim_start_matches('/')
    }

    /// Candidate page URLs for an identifier, in trial order.
    fn candidates(&self, id: &str) -> Vec<String> {
        let base = self.client.base_origin();
        let encoded = urlencoding::encode(id);
        vec![
            format!("{base}/watch/{id}"),
            format!("{base}/movie/{id}"),
            format!("{base}/{id}"),
            format!("{base}/?s={encoded}"),
            format!("{base}/player.php?id={encoded}"),
        ]
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/?s={}", self.client.base_origin(), urlencoding::encode(query))
    }

    async fn try_resolve(&self, args: &ResolveArgs) -> Result<Vec<StreamDescriptor>> {
        let raw = args.identifier().ok_or(ScrapeError::MissingIdentifier)?;
        let id = Self::normalize_id(raw);
        if id.is_empty() {
            return Err(ScrapeError::MissingIdentifier);
        }

        for page in self.candidates(id) {
            debug!(candidate = %page, "trying candidate page");
            let html = match self.client.fetch_html(&page, &FetchOptions::default()).await {
                Ok(html) => html,
                Err(err) => {
                    warn!(candidate = %page, error = %err, "candidate fetch failed");
                    continue;
                }
            };

            let mut urls = extract::extract_streams(&html, &page);

            // Follow embedded players only when the page itself gave us
            // nothing to work with.
            if urls.is_empty() {
                urls.extend(iframe::follow_iframes(&self.client, &page, &html).await);
            }

            match self.probe.probe(&html, &page, &self.client).await {
                Ok(mut extra) => urls.append(&mut extra),
                Err(err) => {
                    warn!(candidate = %page, error = %err, "json probe failed");
                }
            }

            let urls = dedup(urls);
            if !urls.is_empty() {
                debug!(candidate = %page, count = urls.len(), "streams found");
                return Ok(urls.iter().map(|u| normalize(u)).collect());
            }
        }

        // Last resort: scrape the free-text search page.
        let search_page = self.search_url(id);
        match self.client.fetch_html(&search_page, &FetchOptions::default()).await {
            Ok(html) => {
                let urls = dedup(extract::extract_streams(&html, &search_page));
                if !urls.is_empty() {
                    debug!(count = urls.len(), "streams found via search fallback");
                    return Ok(urls.iter().map(|u| normalize(u)).collect());
                }
            }
            Err(err) => {
                warn!(error = %err, "search fallback fetch failed");
            }
        }

        Ok(Vec::new())
    }

    async fn try_search(&self, query: &str) -> Result<Vec<CatalogEntry>> {
        let url = self.search_url(query);
        let html = self.client.fetch_html(&url, &FetchOptions::default()).await?;

        let mut entries = self.entries_from_blocks(&html);
        if entries.is_empty() {
            entries = self.entries_from_watch_anchors(&html);
        }
        Ok(entries)
    }

    /// Structured pass: repeated content blocks with a link and heading.
    fn entries_from_blocks(&self, html: &str) -> Vec<CatalogEntry> {
        let document = Html::parse_document(html);
        let base = self.client.base();
        let mut entries = Vec::new();

        for block in document.select(&RESULT_BLOCK_SELECTOR) {
            let Some(link) = block.select(&BLOCK_LINK_SELECTOR).next() else {
                continue;
            };
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let title = block
                .select(&BLOCK_TITLE_SELECTOR)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| link.text().collect::<String>().trim().to_string());

            if href.is_empty() || title.is_empty() {
                continue;
            }
            entries.push(self.entry(href, title, base));
        }

        entries
    }

    /// Fallback pass: any anchor that looks like a content page.
    fn entries_from_watch_anchors(&self, html: &str) -> Vec<CatalogEntry> {
        let document = Html::parse_document(html);
        let base = self.client.base();
        let mut entries = Vec::new();

        for link in document.select(&BLOCK_LINK_SELECTOR) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let text = link.text().collect::<String>().trim().to_string();
            if href.contains("/watch") && text.chars().count() > 3 {
                entries.push(self.entry(href, text, base));
            }
        }

        entries
    }

    fn entry(&self, href: &str, name: String, base: &Url) -> CatalogEntry {
        let origin = self.client.base_origin();
        let path = href
            .strip_prefix(origin.as_str())
            .unwrap_or(href)
            .trim_start_matches('/');
        CatalogEntry {
            id: format!("{PROVIDER_ID}:{path}"),
            name,
            media_type: MediaType::Movie,
            url: resolve_url(href, Some(base)),
        }
    }
}

#[async_trait]
impl StreamProvider for A111477Provider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn name(&self) -> &'static str {
        "A111477"
    }

    async fn resolve(&self, args: &ResolveArgs) -> Vec<StreamDescriptor> {
        match self.try_resolve(args).await {
            Ok(streams) => streams,
            Err(err) => {
                warn!(provider = PROVIDER_ID, error = %err, "resolve failed, returning no streams");
                Vec::new()
            }
        }
    }

    async fn search(&self, query: &str) -> Vec<CatalogEntry> {
        if query.is_empty() {
            return Vec::new();
        }
        match self.try_search(query).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(provider = PROVIDER_ID, error = %err, "search failed, returning no entries");
                Vec::new()
            }
        }
    }
}

/// Drop empties and duplicates, keeping first-seen order.
fn dedup(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter()
        .filter(|u| !u.is_empty() && seen.insert(u.clone()))
        .collect()
}
