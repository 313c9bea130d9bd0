//! HTTP client for a single scraped origin.
//!
//! Wraps `reqwest` with the headers a site expects from a browser-ish
//! visitor (fixed User-Agent, Referer defaulting to the site's own
//! origin), a 5-redirect cap, and a cache-first fetch path: a body
//! cached within the TTL is returned without touching the network, and
//! the cache is only ever populated by successful responses.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, ACCEPT, REFERER};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::cache::{FetchCache, FetchKind};
use crate::error::{Result, ScrapeError};

/// Synthetic browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; StreamScout/1.0; +https://github.com/)";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default per-request timeout: 15 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const MAX_REDIRECTS: usize = 5;

/// Per-request overrides for a fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Referer to send instead of the site's base origin.
    pub referer: Option<String>,
    /// Timeout override for this request only.
    pub timeout: Option<Duration>,
    /// Extra headers, applied last so they win over the defaults.
    pub headers: HeaderMap,
}

impl FetchOptions {
    /// Options carrying only a Referer override.
    pub fn with_referer(referer: impl Into<String>) -> Self {
        Self {
            referer: Some(referer.into()),
            ..Self::default()
        }
    }
}

/// HTTP client rooted at one site origin, with a shared TTL cache.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    cache: FetchCache,
    base: Url,
}

impl SiteClient {
    /// Create a client for `base` with a fresh default cache.
    pub fn new(base: &str) -> Result<Self> {
        Self::with_cache(base, FetchCache::new())
    }

    /// Create a client for `base` sharing an existing cache.
    ///
    /// The cache is injected rather than hidden so hosts can share one
    /// cache across providers and tests can prime it with fixtures.
    pub fn with_cache(base: &str, cache: FetchCache) -> Result<Self> {
        let base = Url::parse(base)?;
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(DEFAULT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client, cache, base })
    }

    /// The origin this client is rooted at, e.g. `https://site.example`.
    pub fn base_origin(&self) -> String {
        self.base.origin().ascii_serialization()
    }

    /// The configured base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The cache shared by this client.
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// The underlying reqwest client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Fetch a page as text, cache-first.
    pub async fn fetch_html(&self, url: &str, opts: &FetchOptions) -> Result<String> {
        let body = self.fetch(FetchKind::Html, url, opts).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Fetch a URL as raw bytes, cache-first.
    pub async fn fetch_raw(&self, url: &str, opts: &FetchOptions) -> Result<Bytes> {
        self.fetch(FetchKind::Raw, url, opts).await
    }

    #[instrument(skip(self, opts), fields(url = %url))]
    async fn fetch(&self, kind: FetchKind, url: &str, opts: &FetchOptions) -> Result<Bytes> {
        if let Some(cached) = self.cache.get(kind, url).await {
            return Ok(cached);
        }

        debug!("cache miss, fetching");

        let referer = opts
            .referer
            .clone()
            .unwrap_or_else(|| self.base_origin());

        let mut request = self.client.get(url).header(REFERER, referer);
        if kind == FetchKind::Html {
            request = request.header(ACCEPT, ACCEPT_HTML);
        }
        if let Some(timeout) = opts.timeout {
            request = request.timeout(timeout);
        }
        for (name, value) in &opts.headers {
            request = request.header(name, value.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        // Redirects are followed by the client, so this is the terminal
        // status. 3xx here means the redirect cap was reached.
        if !(status.is_success() || status.is_redirection()) {
            return Err(ScrapeError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        self.cache.insert(kind, url, body.clone()).await;

        debug!(bytes = body.len(), %status, "fetched and cached");
        Ok(body)
    }
}
