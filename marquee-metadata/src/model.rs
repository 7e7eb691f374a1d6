//! Provider-neutral descriptions of titles and their playable sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Catalogue a title belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(format!("unknown media type '{other}' (expected movie or tv)")),
        }
    }
}

/// Class of video requested for a title.
///
/// `Trailer` doubles as the fallback class: when a `Full` source cannot be
/// played, the player retries once with a trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Trailer,
    Full,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Trailer => "trailer",
            SourceKind::Full => "full",
        }
    }

    /// Whether this class is already the fallback class.
    pub fn is_fallback(&self) -> bool {
        matches!(self, SourceKind::Trailer)
    }

    /// The class to retry with after a failure, if any remains.
    pub fn fallback(&self) -> Option<SourceKind> {
        match self {
            SourceKind::Full => Some(SourceKind::Trailer),
            SourceKind::Trailer => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trailer" => Ok(SourceKind::Trailer),
            // The web front end called full-length content "movie"
            "full" | "movie" => Ok(SourceKind::Full),
            other => Err(format!("unknown video kind '{other}' (expected trailer or full)")),
        }
    }
}

/// Descriptive metadata shown alongside the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDetails {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub duration_seconds: Option<f64>,
    pub release_year: Option<i32>,
    pub rating: Option<f64>,
}

impl ContentDetails {
    /// Title as shown in the player header, marking trailers.
    pub fn display_title(&self, kind: SourceKind) -> String {
        match kind {
            SourceKind::Full => self.title.clone(),
            SourceKind::Trailer => format!("{} (Trailer)", self.title),
        }
    }

    /// Runtime as `1h 5m` or `45m`.
    pub fn runtime_label(&self) -> Option<String> {
        let total_minutes = (self.duration_seconds? / 60.0).round() as u64;
        if total_minutes == 0 {
            return None;
        }
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        Some(if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        })
    }

    pub fn rating_label(&self) -> Option<String> {
        self.rating.map(|rating| format!("★ {rating:.1}"))
    }
}

/// A resolved, playable source for a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableSource {
    pub url: Url,
    pub kind: SourceKind,
    pub origin: SourceOrigin,
}

/// Where a playable source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A trailer or teaser listed for the title.
    Listed,
    /// A stand-in sample clip, used when nothing is listed.
    Sample,
}

/// A title related to the one being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedTitle {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_url: Option<Url>,
    pub rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(duration_seconds: Option<f64>, rating: Option<f64>) -> ContentDetails {
        ContentDetails {
            id: 603,
            media_type: MediaType::Movie,
            title: "The Matrix".to_string(),
            duration_seconds,
            release_year: Some(1999),
            rating,
        }
    }

    #[test]
    fn runtime_label_splits_hours() {
        assert_eq!(
            details(Some(136.0 * 60.0), None).runtime_label().as_deref(),
            Some("2h 16m")
        );
        assert_eq!(
            details(Some(45.0 * 60.0), None).runtime_label().as_deref(),
            Some("45m")
        );
        assert_eq!(details(None, None).runtime_label(), None);
    }

    #[test]
    fn rating_label_has_one_decimal() {
        assert_eq!(
            details(None, Some(8.217)).rating_label().as_deref(),
            Some("★ 8.2")
        );
    }

    #[test]
    fn trailer_titles_are_marked() {
        let d = details(None, None);
        assert_eq!(d.display_title(SourceKind::Trailer), "The Matrix (Trailer)");
        assert_eq!(d.display_title(SourceKind::Full), "The Matrix");
    }

    #[test]
    fn only_full_sources_have_a_fallback() {
        assert_eq!(SourceKind::Full.fallback(), Some(SourceKind::Trailer));
        assert_eq!(SourceKind::Trailer.fallback(), None);
        assert!(SourceKind::Trailer.is_fallback());
    }

    #[test]
    fn parses_legacy_movie_kind() {
        assert_eq!("movie".parse::<SourceKind>(), Ok(SourceKind::Full));
        assert_eq!("TV".parse::<MediaType>(), Ok(MediaType::Tv));
        assert!("clip".parse::<SourceKind>().is_err());
    }
}
