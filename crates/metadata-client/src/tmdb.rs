//! TMDB metadata provider
//!
//! API Flow:
//! 1. `GET {api_url}/movie/{id}?api_key=...&language=...` → movie details JSON
//! 2. Map `poster_path`, `overview`, `release_date`, `vote_average` and
//!    `genres[].name` onto a `MetadataRecord`, substituting placeholders
//!    for anything absent

use crate::{FetchError, MetadataFetcher, MetadataRecord, NO_OVERVIEW, NOT_AVAILABLE};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// TMDB configuration loaded from `TMDB_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct TmdbConfig {
    /// API key (`TMDB_API_KEY`)
    pub api_key: String,

    /// Base URL of the v3 API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL that poster paths are appended to
    #[serde(default = "default_image_url")]
    pub image_url: String,

    /// Base URL of the public movie pages
    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

/// Public movie pages on themoviedb.org
pub const DEFAULT_SITE_URL: &str = "https://www.themoviedb.org/movie";

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl TmdbConfig {
    /// Defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_api_url(),
            image_url: default_image_url(),
            site_url: default_site_url(),
            language: default_language(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("TMDB_")
            .from_env::<TmdbConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load TMDB config: {}", e))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Subset of the TMDB movie details document we render
#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    poster_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    genres: Option<Vec<TmdbGenre>>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

/// Present and non-blank, or nothing
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TmdbMovieDetails {
    fn into_record(self, detail_link: String, config: &TmdbConfig) -> MetadataRecord {
        let poster_url = non_blank(self.poster_path)
            .map(|path| {
                format!(
                    "{}/{}",
                    config.image_url.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            })
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let genres = self
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|genre| genre.name)
            .collect::<Vec<_>>()
            .join(", ");

        MetadataRecord {
            poster_url,
            overview: non_blank(self.overview).unwrap_or_else(|| NO_OVERVIEW.to_string()),
            release_date: non_blank(self.release_date)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: self
                .vote_average
                .map(|rating| format!("{:.1}", rating))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            genres,
            detail_link,
        }
    }
}

/// Metadata fetcher backed by the TMDB HTTP API
#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, FetchError> {
        let http_client = HttpClient::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// Decode a movie details document into a record
    fn parse_details(&self, movie_id: u32, body: &str) -> Result<MetadataRecord, FetchError> {
        let details: TmdbMovieDetails = serde_json::from_str(body).map_err(|e| {
            error!(movie_id, error = %e, "Failed to deserialize TMDB response");
            FetchError::Malformed {
                movie_id,
                reason: e.to_string(),
            }
        })?;
        Ok(details.into_record(self.detail_link(movie_id), &self.config))
    }
}

#[async_trait]
impl MetadataFetcher for TmdbClient {
    async fn fetch(&self, movie_id: u32) -> Result<MetadataRecord, FetchError> {
        let url = format!(
            "{}/movie/{}",
            self.config.api_url.trim_end_matches('/'),
            movie_id
        );
        debug!(movie_id, "Fetching TMDB metadata");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(movie_id, status = status.as_u16(), "TMDB returned an error status");
            return Err(FetchError::Status {
                movie_id,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        self.parse_details(movie_id, &body)
    }

    fn detail_link(&self, movie_id: u32) -> String {
        format!("{}/{}", self.config.site_url.trim_end_matches('/'), movie_id)
    }
}
