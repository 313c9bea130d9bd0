//! Raw URL to stream descriptor normalization.
//!
//! Pure classification: quality from ordered substring rules over the
//! whole URL, container from the URL path's extension. The same input
//! always yields the same descriptor.

use std::fmt;

use serde::Serialize;

/// Title prefix for synthesized descriptor titles.
const TITLE_PREFIX: &str = "A111477";

/// Video quality tier guessed from the URL.
///
/// Rules are evaluated in declaration order; the first match wins, so a
/// URL mentioning both "1080" and "720" classifies as 1080p.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quality {
    #[serde(rename = "2160p")]
    Q2160p,
    #[serde(rename = "1080p")]
    Q1080p,
    #[serde(rename = "720p")]
    Q720p,
    #[serde(rename = "480p")]
    Q480p,
    #[serde(rename = "SD")]
    Sd,
}

impl Quality {
    /// Classify a URL by case-insensitive substring rules.
    pub fn detect(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.contains("2160") || lower.contains("4k") {
            Self::Q2160p
        } else if lower.contains("1080") || lower.contains("fullhd") || lower.contains("fhd") {
            Self::Q1080p
        } else if lower.contains("720") || lower.contains("hd") {
            Self::Q720p
        } else if lower.contains("480") {
            Self::Q480p
        } else {
            Self::Sd
        }
    }

    /// Human-readable label, e.g. `"1080p"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Q2160p => "2160p",
            Self::Q1080p => "1080p",
            Self::Q720p => "720p",
            Self::Q480p => "480p",
            Self::Sd => "SD",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Container format guessed from the URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Hls,
    Dash,
    /// Default when nothing else matches; not a true detection.
    Mp4,
}

impl Container {
    /// Classify by the path's extension, ignoring query and fragment.
    pub fn detect(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_lowercase();
        if path.ends_with(".m3u8") {
            Self::Hls
        } else if path.ends_with(".mpd") {
            Self::Dash
        } else {
            Self::Mp4
        }
    }
}

/// One playable stream handed back to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDescriptor {
    /// Synthesized title: fixed prefix plus the quality label.
    pub title: String,
    /// Absolute stream URL.
    pub url: String,
    pub quality: Quality,
    pub container: Container,
    /// Reserved for subtitle tracks; currently always empty.
    pub subtitles: Vec<String>,
    /// Reserved for torrent-backed hosts; currently always `None`.
    pub info_hash: Option<String>,
}

/// Build a descriptor from a raw stream URL. Deterministic.
pub fn normalize(url: &str) -> StreamDescriptor {
    let quality = Quality::detect(url);
    let container = Container::detect(url);
    StreamDescriptor {
        title: format!("{TITLE_PREFIX} - {quality}"),
        url: url.to_string(),
        quality,
        container,
        subtitles: Vec::new(),
        info_hash: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_from_extension() {
        assert_eq!(Container::detect("https://cdn/x.m3u8"), Container::Hls);
        assert_eq!(Container::detect("https://cdn/x.mpd"), Container::Dash);
        assert_eq!(Container::detect("https://cdn/x.mp4"), Container::Mp4);
        assert_eq!(Container::detect("https://cdn/x.mkv"), Container::Mp4);
    }

    #[test]
    fn container_ignores_query_string() {
        assert_eq!(
            Container::detect("https://cdn/master.m3u8?token=abc"),
            Container::Hls
        );
        assert_eq!(
            Container::detect("https://cdn/manifest.mpd#t=10"),
            Container::Dash
        );
    }

    #[test]
    fn quality_precedence_first_rule_wins() {
        // Mentions both 1080 and 720: the 1080 rule fires first.
        assert_eq!(
            Quality::detect("https://cdn/video-1080p-from-720p-source.mp4"),
            Quality::Q1080p
        );
    }

    #[test]
    fn quality_rules() {
        assert_eq!(Quality::detect("https://cdn/movie-4K.mp4"), Quality::Q2160p);
        assert_eq!(Quality::detect("https://cdn/2160/x.mp4"), Quality::Q2160p);
        assert_eq!(Quality::detect("https://cdn/fhd/x.mp4"), Quality::Q1080p);
        assert_eq!(Quality::detect("https://cdn/hd/x.mp4"), Quality::Q720p);
        assert_eq!(Quality::detect("https://cdn/x-480.mp4"), Quality::Q480p);
        assert_eq!(Quality::detect("https://cdn/x.mp4"), Quality::Sd);
    }

    #[test]
    fn normalize_is_deterministic() {
        let a = normalize("https://cdn/video-1080p.m3u8");
        let b = normalize("https://cdn/video-1080p.m3u8");
        assert_eq!(a, b);
        assert_eq!(a.quality, Quality::Q1080p);
        assert_eq!(a.container, Container::Hls);
        assert_eq!(a.title, "A111477 - 1080p");
        assert!(a.subtitles.is_empty());
        assert!(a.info_hash.is_none());
    }

    #[test]
    fn descriptor_serializes_with_host_labels() {
        let descriptor = normalize("https://cdn/x-720.m3u8");
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["quality"], "720p");
        assert_eq!(json["container"], "hls");
    }
}
