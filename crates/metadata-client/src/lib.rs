//! Movie metadata client for enriching recommendations.
//!
//! This crate fetches descriptive metadata (poster, overview, release date,
//! rating, genres) for a movie from an external movie database. It handles:
//! - The `MetadataFetcher` seam the recommendation service depends on
//! - A TMDB implementation over HTTP (`TmdbClient`)
//! - Placeholder values for fields the service leaves out
//! - Error types for unreachable or misbehaving services
//!
//! A failed fetch is never fatal to a batch: callers substitute
//! `MetadataFetcher::placeholder` for the one movie that failed.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod offline;
pub mod tmdb;

pub use offline::OfflineFetcher;
pub use tmdb::{TmdbClient, TmdbConfig};

/// Shown when the service has no overview for a movie
pub const NO_OVERVIEW: &str = "No overview available.";

/// Shown for any other missing field
pub const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur when fetching metadata for one movie
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure; the request URL is stripped since it carries the API key
    #[error("HTTP client error: {0}")]
    Http(reqwest::Error),

    #[error("Metadata service returned status {status} for movie {movie_id}: {body}")]
    Status {
        movie_id: u32,
        status: u16,
        body: String,
    },

    #[error("Malformed metadata for movie {movie_id}: {reason}")]
    Malformed { movie_id: u32, reason: String },

    #[error("Metadata request for movie {movie_id} timed out after {timeout_ms} ms")]
    Timeout { movie_id: u32, timeout_ms: u64 },

    #[error("Metadata task for movie {movie_id} failed: {reason}")]
    TaskFailed { movie_id: u32, reason: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e.without_url())
    }
}

/// Display data for one movie, with placeholders already substituted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub poster_url: String,
    pub overview: String,
    pub release_date: String,
    pub rating: String,
    /// Comma-separated genre names; empty when unknown
    pub genres: String,
    pub detail_link: String,
}

impl MetadataRecord {
    /// All-placeholder record; only the detail link is real
    pub fn placeholder(detail_link: impl Into<String>) -> Self {
        Self {
            poster_url: NOT_AVAILABLE.to_string(),
            overview: NO_OVERVIEW.to_string(),
            release_date: NOT_AVAILABLE.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            genres: String::new(),
            detail_link: detail_link.into(),
        }
    }
}

/// Source of movie metadata, keyed by the catalog's external movie id.
///
/// `Send + Sync` so one fetcher can serve concurrent enrichment tasks.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Fetch metadata for a single movie
    async fn fetch(&self, movie_id: u32) -> Result<MetadataRecord, FetchError>;

    /// Public page for a movie; needs no network call
    fn detail_link(&self, movie_id: u32) -> String;

    /// Record to render when `fetch` fails
    fn placeholder(&self, movie_id: u32) -> MetadataRecord {
        MetadataRecord::placeholder(self.detail_link(movie_id))
    }

    /// False for fetchers that only ever return placeholders
    fn is_live(&self) -> bool {
        true
    }
}
