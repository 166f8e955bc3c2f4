//! Spotify track URL validation.
//!
//! Accepts `http(s)://open.spotify.com/track/<id>` links (anything may follow
//! the id, e.g. `?si=...`) and extracts the alphanumeric track id.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

static TRACK_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://open\.spotify\.com/track/[a-zA-Z0-9]+").expect("valid track URL regex")
});

static TRACK_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"track/([a-zA-Z0-9]+)").expect("valid track id regex"));

/// Client input that cannot be turned into a [`TrackReference`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No `url` given, or only whitespace.
    #[error("The url parameter is not set")]
    MissingUrl,

    /// Not an `open.spotify.com/track/...` link.
    #[error("Invalid Spotify track URL")]
    InvalidUrl,

    /// The URL matched but no track id could be extracted.
    #[error("Track id not found in URL")]
    MissingTrackId,
}

/// A validated Spotify track URL and its track id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReference {
    url: String,
    track_id: String,
}

impl TrackReference {
    /// Validate a raw `url` query value.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let url = raw.map(str::trim).unwrap_or_default();
        if url.is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        if !TRACK_URL.is_match(url) {
            return Err(ValidationError::InvalidUrl);
        }

        // Extracted separately from the shape check above.
        let track_id = TRACK_ID
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(ValidationError::MissingTrackId)?;

        Ok(Self {
            url: url.to_string(),
            track_id,
        })
    }

    /// The trimmed URL as given by the client.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_url() {
        let track =
            TrackReference::parse(Some("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC"))
                .unwrap();
        assert_eq!(track.track_id(), "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(track.url(), "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_parse_http_url_with_query_string() {
        let track =
            TrackReference::parse(Some("http://open.spotify.com/track/abc123?si=xyz")).unwrap();
        assert_eq!(track.track_id(), "abc123");
        assert_eq!(track.url(), "http://open.spotify.com/track/abc123?si=xyz");
    }

    #[test]
    fn test_id_stops_at_first_non_alphanumeric() {
        let track = TrackReference::parse(Some("https://open.spotify.com/track/Ab9_rest")).unwrap();
        assert_eq!(track.track_id(), "Ab9");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let track = TrackReference::parse(Some("  https://open.spotify.com/track/xyz  ")).unwrap();
        assert_eq!(track.url(), "https://open.spotify.com/track/xyz");
        assert_eq!(track.track_id(), "xyz");
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(TrackReference::parse(None), Err(ValidationError::MissingUrl));
        assert_eq!(TrackReference::parse(Some("")), Err(ValidationError::MissingUrl));
        assert_eq!(TrackReference::parse(Some("   ")), Err(ValidationError::MissingUrl));
    }

    #[test]
    fn test_rejects_non_track_urls() {
        for url in [
            "https://open.spotify.com/album/4uLU6hMCjMI75M1A2tKUQC",
            "https://example.com/track/abc",
            "open.spotify.com/track/abc",
            "https://open.spotify.com/track/",
            "https://open.spotify.com/track/-abc",
            "see https://open.spotify.com/track/abc",
        ] {
            assert_eq!(
                TrackReference::parse(Some(url)),
                Err(ValidationError::InvalidUrl),
                "{url}"
            );
        }
    }
}
