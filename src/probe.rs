//! JSON player-endpoint probing.
//!
//! Some iframe players load their playlist from an XHR/JSON endpoint
//! instead of embedding URLs in the page. [`JsonProbe`] is the hook for
//! site-specific implementations of that lookup; the shipped default is
//! a no-op, so providers work unchanged until someone reverse-engineers
//! an endpoint and plugs a real probe in.

use anyhow::Result;
use async_trait::async_trait;

use crate::client::SiteClient;

/// Capability hook for extracting stream URLs from JSON player endpoints.
#[async_trait]
pub trait JsonProbe: Send + Sync {
    /// Inspect a fetched page and return any stream URLs its player
    /// config endpoint yields. Implementations may issue further
    /// requests through `client`.
    async fn probe(&self, html: &str, page_url: &str, client: &SiteClient)
        -> Result<Vec<String>>;
}

/// Default probe: never finds anything, never fails.
pub struct NoopProbe;

#[async_trait]
impl JsonProbe for NoopProbe {
    async fn probe(
        &self,
        _html: &str,
        _page_url: &str,
        _client: &SiteClient,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_probe_yields_nothing() {
        let client = SiteClient::new("https://site.example").unwrap();
        let probe = NoopProbe;
        let urls = probe
            .probe("<html></html>", "https://site.example/watch/x", &client)
            .await
            .unwrap();
        assert!(urls.is_empty());
    }
}
