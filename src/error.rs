//! Scraper error taxonomy.
//!
//! Only [`ScrapeError::MissingIdentifier`] is ever raised on the caller's
//! behalf, and even that is caught at the provider boundary. Every other
//! variant describes a single failed step (one page, one iframe) that the
//! orchestrator logs and skips.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while fetching or scraping a site.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// No usable identifier in the resolve arguments.
    #[error("missing content identifier")]
    MissingIdentifier,

    /// Network-level failure (DNS, connect, timeout, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal response status outside the accepted 2xx/3xx window.
    #[error("unexpected status {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// The configured base origin is not a valid URL.
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_url() {
        let err = ScrapeError::Status {
            status: StatusCode::FORBIDDEN,
            url: "https://example.com/watch/foo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("/watch/foo"));
    }

    #[test]
    fn base_url_error_converts() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: ScrapeError = parse_err.into();
        assert!(matches!(err, ScrapeError::BaseUrl(_)));
    }
}
