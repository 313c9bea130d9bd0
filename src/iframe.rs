//! One-level iframe following.
//!
//! Player pages often host the real stream inside an embedded iframe.
//! This pass re-reads the iframe targets from a fetched page, fetches
//! each one with the embedding page as Referer, and runs extraction on
//! the embedded document. A failed iframe is logged and skipped; the
//! rest are still tried. Results are concatenated as-is - the
//! orchestrator deduplicates upstream.

use tracing::{debug, warn};

use crate::client::{FetchOptions, SiteClient};
use crate::extract;

/// Fetch every iframe embedded in `html` and extract streams from each.
pub async fn follow_iframes(client: &SiteClient, page_url: &str, html: &str) -> Vec<String> {
    let mut results = Vec::new();

    for iframe_url in extract::iframe_sources(html, page_url) {
        debug!(iframe = %iframe_url, "following iframe");
        let opts = FetchOptions::with_referer(page_url);
        match client.fetch_html(&iframe_url, &opts).await {
            Ok(inner) => {
                let mut urls = extract::extract_streams(&inner, &iframe_url);
                results.append(&mut urls);
            }
            Err(err) => {
                warn!(iframe = %iframe_url, error = %err, "iframe fetch failed, skipping");
            }
        }
    }

    results
}
