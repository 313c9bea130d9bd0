//! `StreamScout` - heuristic stream scraping for streaming sites
//!
//! # Features
//!
//! - **Cache-first fetching**: browser-like headers, 5-redirect cap,
//!   5-minute TTL over raw response bodies
//! - **Heuristic extraction**: video tags, media-extension anchors,
//!   play/stream/download link text, iframes, inline player scripts
//! - **One-level iframe following** for embedded players
//! - **Normalized descriptors**: quality tier + container guessed from
//!   the URL, always absolute, always a (possibly empty) list
//!
//! # Example
//!
//! ```rust,no_run
//! use streamscout::{A111477Provider, ResolveArgs, StreamProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = A111477Provider::new()?;
//!     let streams = provider.resolve(&ResolveArgs::from_id("a111477:some-movie")).await;
//!     for stream in streams {
//!         println!("{} {} ({:?})", stream.title, stream.url, stream.container);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod extract;
pub mod iframe;
pub mod normalize;
pub mod probe;
pub mod provider;
pub mod providers;

pub use cache::{FetchCache, FetchKind};
pub use client::{FetchOptions, SiteClient};
pub use error::{Result, ScrapeError};
pub use normalize::{normalize, Container, Quality, StreamDescriptor};
pub use probe::{JsonProbe, NoopProbe};
pub use provider::{CatalogEntry, MediaType, ResolveArgs, StreamProvider};
pub use providers::A111477Provider;

/// Version of streamscout
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a `tracing` subscriber honoring `RUST_LOG`.
///
/// Verbosity is env-driven (e.g. `RUST_LOG=streamscout=debug`); defaults
/// to `warn`. Safe to call more than once - later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
