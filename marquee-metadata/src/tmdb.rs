use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};
use rand::seq::IndexedRandom;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::model::{
    ContentDetails, MediaType, PlayableSource, RelatedTitle, SourceKind, SourceOrigin,
};
use crate::provider::MetadataProvider;

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3/";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Number of related titles kept from the similar-titles listing.
pub const SIMILAR_LIMIT: usize = 8;

/// Stand-in clips used when a title lists no trailer.
pub const SAMPLE_CLIPS: &[&str] = &[
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4",
];

/// Poster width requested for related titles.
const POSTER_SIZE: &str = "w500";

#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: Client,
    base_url: Url,
    api_key: String,
    sample_fallback: bool,
}

impl TmdbProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, TMDB_API_BASE)
    }

    /// Build a provider from `TMDB_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TMDB_API_KEY").map_err(|_| ProviderError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Self::new(api_key)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            sample_fallback: true,
        })
    }

    /// Whether titles without a listed trailer resolve to a sample clip.
    pub fn with_sample_fallback(mut self, enabled: bool) -> Self {
        self.sample_fallback = enabled;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("TMDB request: {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, path));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn status_error(status: StatusCode, path: &str) -> ProviderError {
    if status == StatusCode::UNAUTHORIZED {
        ProviderError::InvalidApiKey
    } else if status == StatusCode::NOT_FOUND {
        ProviderError::NotFound
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited
    } else {
        ProviderError::ApiError(format!("{path} returned {status}"))
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, id: u64, media_type: MediaType) -> Result<ContentDetails> {
        let wire: WireDetails = self.get_json(&format!("{media_type}/{id}")).await?;
        details_from_wire(wire, media_type)
    }

    async fn fetch_playable_source(
        &self,
        id: u64,
        media_type: MediaType,
        kind: SourceKind,
    ) -> Result<Option<PlayableSource>> {
        // A failed videos listing is not fatal; the sample fallback still applies
        let listed = match self
            .get_json::<WireVideos>(&format!("{media_type}/{id}/videos"))
            .await
        {
            Ok(videos) => select_trailer(&videos.results)?,
            Err(err) => {
                warn!("Failed to list videos for {media_type}/{id}: {err}");
                None
            }
        };

        // No full-length content is listed, so both classes resolve to the trailer
        if let Some(url) = listed {
            return Ok(Some(PlayableSource {
                url,
                kind,
                origin: SourceOrigin::Listed,
            }));
        }

        if !self.sample_fallback {
            return Ok(None);
        }

        info!("No trailer available for {media_type}/{id}. Loading sample content...");
        Ok(pick_sample_clip()?.map(|url| PlayableSource {
            url,
            kind,
            origin: SourceOrigin::Sample,
        }))
    }

    async fn fetch_similar(&self, id: u64, media_type: MediaType) -> Result<Vec<RelatedTitle>> {
        let wire: WirePage<WireSimilar> =
            self.get_json(&format!("{media_type}/{id}/similar")).await?;
        Ok(related_from_wire(wire.results))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDetails {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVideos {
    #[serde(default)]
    pub results: Vec<WireVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSimilar {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

pub(crate) fn details_from_wire(wire: WireDetails, media_type: MediaType) -> Result<ContentDetails> {
    let title = wire
        .title
        .or(wire.name)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::ParseError(format!("title {} has no name", wire.id)))?;

    let release_year = wire
        .release_date
        .or(wire.first_air_date)
        .and_then(|date| NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok())
        .map(|date| date.year());

    let runtime_minutes = wire
        .runtime
        .or_else(|| wire.episode_run_time.first().copied())
        .filter(|minutes| *minutes > 0);

    Ok(ContentDetails {
        id: wire.id,
        media_type,
        title,
        duration_seconds: runtime_minutes.map(|minutes| f64::from(minutes) * 60.0),
        release_year,
        rating: wire.vote_average.filter(|rating| *rating > 0.0),
    })
}

/// Pick the preferred YouTube trailer (or teaser) and build its embed URL.
pub(crate) fn select_trailer(videos: &[WireVideo]) -> Result<Option<Url>> {
    let candidates: Vec<&WireVideo> = videos
        .iter()
        .filter(|v| v.site == "YouTube" && (v.video_type == "Trailer" || v.video_type == "Teaser"))
        .collect();

    let Some(preferred) = candidates
        .iter()
        .find(|v| v.video_type == "Trailer")
        .or_else(|| candidates.first())
    else {
        return Ok(None);
    };

    let mut url = Url::parse(YOUTUBE_EMBED_BASE)?.join(&preferred.key)?;
    url.query_pairs_mut()
        .append_pair("autoplay", "1")
        .append_pair("controls", "0")
        .append_pair("modestbranding", "1")
        .append_pair("rel", "0");
    Ok(Some(url))
}

fn pick_sample_clip() -> Result<Option<Url>> {
    SAMPLE_CLIPS
        .choose(&mut rand::rng())
        .map(|clip| Url::parse(clip).map_err(ProviderError::from))
        .transpose()
}

pub(crate) fn related_from_wire(items: Vec<WireSimilar>) -> Vec<RelatedTitle> {
    items
        .into_iter()
        .take(SIMILAR_LIMIT)
        .filter_map(|item| {
            // Only movies carry `title`; series use `name`
            let (title, media_type) = match (item.title, item.name) {
                (Some(title), _) => (title, MediaType::Movie),
                (None, Some(name)) => (name, MediaType::Tv),
                (None, None) => return None,
            };
            let poster_url = item.poster_path.and_then(|path| {
                Url::parse(&format!("{TMDB_IMAGE_BASE}/{POSTER_SIZE}{path}")).ok()
            });
            Some(RelatedTitle {
                id: item.id,
                media_type,
                title,
                poster_url,
                rating: item.vote_average.filter(|rating| *rating > 0.0),
            })
        })
        .collect()
}
