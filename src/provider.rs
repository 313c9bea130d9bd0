//! Stream provider trait and host-facing records.
//!
//! A [`StreamProvider`] adapts one streaming site: given an opaque
//! content identifier it returns playable stream descriptors, and given
//! free text it returns catalog entries. Both operations are total -
//! every failure inside a provider degrades to an empty list, so hosts
//! never need error handling around these calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::normalize::StreamDescriptor;

/// Arguments a host passes to [`StreamProvider::resolve`].
///
/// `season` and `episode` are accepted for host compatibility but not
/// used by the current site adapters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveArgs {
    /// Content identifier, optionally provider-prefixed
    /// (`"a111477:slug"`, `"a111477:/watch/slug"`, or a bare path).
    #[serde(default)]
    pub id: Option<String>,
    /// Free-text fallback used when `id` is absent.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
}

impl ResolveArgs {
    /// Args carrying only an identifier.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The identifier to resolve: `id` if present, else `query`.
    pub fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.query.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Catalog category of a search result.
///
/// The scraped sites expose no reliable category signal, so everything
/// is tagged [`MediaType::Movie`] today. An enum keeps a future
/// `Series` variant additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
}

/// One catalog row from a provider search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Opaque provider-prefixed identifier, e.g. `"a111477:watch/slug"`.
    pub id: String,
    /// Display title.
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Absolute URL of the detail page.
    pub url: String,
}

/// Trait for site-specific scraping adapters.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Short lowercase provider id, used as the identifier prefix.
    fn id(&self) -> &'static str;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// Whether the provider should be consulted at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Find playable streams for a content identifier.
    ///
    /// Never fails: unreachable sites, scraping misses, and bad input
    /// all come back as an empty list.
    async fn resolve(&self, args: &ResolveArgs) -> Vec<StreamDescriptor>;

    /// Best-effort catalog search. Empty query yields an empty list
    /// without network access; errors degrade to an empty list.
    async fn search(&self, query: &str) -> Vec<CatalogEntry>;
}
