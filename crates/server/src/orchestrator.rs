//! # Recommendation Service
//!
//! This module coordinates one recommendation request end to end:
//! 1. Check the selected title against the active filters (warn, never block)
//! 2. Rank the title's neighbours with the similarity recommender
//! 3. Enrich every neighbour concurrently, one tokio task per movie
//! 4. Assemble cards in rank order, substituting placeholders for any
//!    movie whose metadata could not be fetched
//!
//! Filters only narrow the list a user picks from. They never change which
//! movies are recommended.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, instrument, warn};

use data_loader::{DataIndex, Genre, MovieId, ReleaseYear};
use metadata_client::{FetchError, MetadataFetcher, MetadataRecord};
use pipeline::{FilterSelection, TitleMatch, TitleSearch};
use recommender::{RankedMovie, RecommendError, SimilarityRecommender};

use crate::config::ServiceConfig;

/// Acknowledgement shown after feedback is submitted
pub const FEEDBACK_THANKS: &str = "Thank you for your feedback!";

/// Highest rating accepted by `submit_feedback`
pub const MAX_FEEDBACK_RATING: u8 = 10;

/// Errors surfaced to the caller of the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Exact title missing from the catalog
    #[error(transparent)]
    Recommend(#[from] RecommendError),

    /// Free-text query that matched nothing (blank query or empty catalog)
    #[error("No catalog title matches '{query}'")]
    NoMatch { query: String },

    #[error("Rating {rating} is outside 0-10")]
    InvalidFeedback { rating: u8 },

    #[error(transparent)]
    Filter(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// The selected title is hidden by the active filters.
///
/// Recommendations are still produced from the full catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExclusionWarning {
    pub title: String,
    pub filters: FilterSelection,
}

impl fmt::Display for FilterExclusionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Selected movie is excluded by current filters ({}). Showing all matches.",
            self.filters
        )
    }
}

/// One recommendation request
#[derive(Debug, Clone, Default)]
pub struct RecommendationRequest {
    /// Exact catalog title
    pub title: String,
    pub filters: FilterSelection,
    /// Defaults to `ServiceConfig::recommendation_count`
    pub limit: Option<usize>,
}

impl RecommendationRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: FilterSelection) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A ranked neighbour with its display metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: String,
    pub overview: String,
    pub release_date: String,
    pub rating: String,
    pub genres: String,
    pub detail_link: String,
    pub score: f32,
    /// False when the metadata fields are placeholders, whether the fetch
    /// failed or the fetcher is offline
    pub enriched: bool,
}

impl Recommendation {
    fn from_parts(ranked: RankedMovie, metadata: MetadataRecord, enriched: bool) -> Self {
        Self {
            movie_id: ranked.movie.movie_id,
            title: ranked.movie.title,
            poster_url: metadata.poster_url,
            overview: metadata.overview,
            release_date: metadata.release_date,
            rating: metadata.rating,
            genres: metadata.genres,
            detail_link: metadata.detail_link,
            score: ranked.score,
            enriched,
        }
    }

    /// First `max_chars` characters of the overview, with "..." when cut
    pub fn overview_excerpt(&self, max_chars: usize) -> String {
        match self.overview.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.overview[..cut]),
            None => self.overview.clone(),
        }
    }
}

/// Cards in rank order plus anything the user should be told about
#[derive(Debug, Clone)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<FilterExclusionWarning>,
}

impl RecommendationResponse {
    /// Number of cards rendered with placeholder metadata
    pub fn degraded_count(&self) -> usize {
        self.recommendations.iter().filter(|r| !r.enriched).count()
    }
}

/// A rating of the last set of recommendations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackAck {
    pub message: String,
}

/// Entry point shared by every user-facing surface
#[derive(Clone)]
pub struct RecommendationService {
    data_index: Arc<DataIndex>,
    recommender: SimilarityRecommender,
    search: TitleSearch,
    fetcher: Arc<dyn MetadataFetcher>,
    config: ServiceConfig,
}

impl RecommendationService {
    pub fn new(
        data_index: Arc<DataIndex>,
        fetcher: Arc<dyn MetadataFetcher>,
        config: ServiceConfig,
    ) -> Self {
        let recommender = SimilarityRecommender::new(data_index.clone());
        let search = TitleSearch::new(data_index.clone());
        Self {
            data_index,
            recommender,
            search,
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn recommender(&self) -> &SimilarityRecommender {
        &self.recommender
    }

    /// Genre selector values
    pub fn genres(&self) -> Vec<Genre> {
        self.data_index.catalog().available_genres()
    }

    /// Year selector values, ascending with `Unknown` last
    pub fn release_years(&self) -> Vec<ReleaseYear> {
        self.data_index.catalog().release_years()
    }

    /// Titles a user may pick from under `filters`, in catalog order
    pub fn titles(&self, filters: &FilterSelection) -> Result<Vec<String>> {
        let catalog = self.data_index.catalog();
        let visible = filters.to_pipeline().apply_to_catalog(catalog)?;
        Ok(visible
            .into_iter()
            .filter_map(|index| catalog.get(index).map(|movie| movie.title.clone()))
            .collect())
    }

    /// Closest catalog title to free-text input
    pub fn resolve_query(&self, query: &str) -> Result<TitleMatch> {
        let best = self
            .search
            .best_match(query)
            .ok_or_else(|| ServiceError::NoMatch {
                query: query.to_string(),
            })?;
        info!("Best match for '{}': {} ({})", query, best.title, best.score);
        Ok(best)
    }

    /// Up to `limit` fuzzy matches, best first
    pub fn search(&self, query: &str, limit: usize) -> Vec<TitleMatch> {
        self.search.top_matches(query, limit)
    }

    /// Main entry point: recommendations for an exact catalog title
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn get_recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse> {
        let start_time = Instant::now();
        let limit = request.limit.unwrap_or(self.config.recommendation_count);

        let warnings = self.check_filters(&request.title, &request.filters)?;

        let ranked = self.recommender.recommend(&request.title, limit)?;
        info!("Ranked {} neighbours of '{}'", ranked.len(), request.title);

        let recommendations = self.enrich(ranked).await;

        let response = RecommendationResponse {
            title: request.title,
            recommendations,
            warnings,
        };
        info!(
            "Assembled {} recommendations ({} degraded) in {:.2?}",
            response.recommendations.len(),
            response.degraded_count(),
            start_time.elapsed()
        );
        Ok(response)
    }

    /// Record a rating; nothing is persisted
    pub fn submit_feedback(&self, feedback: Feedback) -> Result<FeedbackAck> {
        if feedback.rating > MAX_FEEDBACK_RATING {
            return Err(ServiceError::InvalidFeedback {
                rating: feedback.rating,
            });
        }
        info!(
            rating = feedback.rating,
            comment = feedback.comment.as_deref().unwrap_or(""),
            "Received feedback"
        );
        Ok(FeedbackAck {
            message: FEEDBACK_THANKS.to_string(),
        })
    }

    /// Warn when the active filters hide the selected title
    fn check_filters(
        &self,
        title: &str,
        filters: &FilterSelection,
    ) -> Result<Vec<FilterExclusionWarning>> {
        if filters.is_unfiltered() {
            return Ok(Vec::new());
        }
        let catalog = self.data_index.catalog();
        let admitted = match catalog.index_of(title) {
            Some(index) => filters.admits(index, catalog)?,
            // Unknown titles fail later with NotFound
            None => return Ok(Vec::new()),
        };
        if admitted {
            return Ok(Vec::new());
        }

        let warning = FilterExclusionWarning {
            title: title.to_string(),
            filters: *filters,
        };
        warn!("{} [{}]", warning, title);
        Ok(vec![warning])
    }

    /// Fetch metadata for every ranked movie concurrently, keeping rank order
    async fn enrich(&self, ranked: Vec<RankedMovie>) -> Vec<Recommendation> {
        let timeout = self.config.enrichment_timeout();
        let timeout_ms = self.config.enrichment_timeout_ms;

        let handles: Vec<_> = ranked
            .iter()
            .map(|movie| {
                let fetcher = self.fetcher.clone();
                let movie_id = movie.movie.movie_id;
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, fetcher.fetch(movie_id)).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout {
                            movie_id,
                            timeout_ms,
                        }),
                    }
                })
            })
            .collect();

        let live = self.fetcher.is_live();
        let mut recommendations = Vec::with_capacity(ranked.len());
        for (movie, handle) in ranked.into_iter().zip(handles) {
            let movie_id = movie.movie.movie_id;
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(FetchError::TaskFailed {
                    movie_id,
                    reason: e.to_string(),
                }),
            };

            let recommendation = match outcome {
                Ok(metadata) => Recommendation::from_parts(movie, metadata, live),
                Err(e) => {
                    warn!(
                        "Using placeholders for '{}' ({}): {}",
                        movie.movie.title, movie_id, e
                    );
                    let placeholder = self.fetcher.placeholder(movie_id);
                    Recommendation::from_parts(movie, placeholder, false)
                }
            };
            recommendations.push(recommendation);
        }
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_loader::{Catalog, SimilarityMatrix};
    use metadata_client::NO_OVERVIEW;
    use std::collections::HashSet;
    use std::time::Duration;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    const TITLES: [(&str, &str); 7] = [
        ("Avatar (2009)", "action adventure sci-fi"),
        ("Aliens (1986)", "action horror sci-fi"),
        ("Titanic (1997)", "drama romance"),
        ("Toy Story (1995)", "animation comedy"),
        ("Heat (1995)", "action thriller crime"),
        ("Up (2009)", "animation comedy adventure"),
        ("Seven (1995)", "thriller drama"),
    ];

    /// Row i scores j as 1.0 - 0.1 * |i - j|, so neighbours rank by distance
    fn build_test_data_index() -> Arc<DataIndex> {
        let mut catalog = Catalog::new();
        for (i, (title, tags)) in TITLES.iter().enumerate() {
            catalog.insert_movie(100 + i as u32, *title, *tags);
        }
        catalog.build_secondary_indices();

        let n = TITLES.len();
        let rows: Vec<Vec<f32>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| 1.0 - 0.1 * (i as f32 - j as f32).abs())
                    .collect::<Vec<f32>>()
            })
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        Arc::new(DataIndex::new(catalog, matrix).unwrap())
    }

    // ============================================================================
    // Mock Metadata Service
    // ============================================================================

    /// Returns deterministic metadata, except for the ids it is told to break
    #[derive(Default)]
    struct MockFetcher {
        failing: HashSet<u32>,
        slow: HashSet<u32>,
        panicking: HashSet<u32>,
    }

    #[async_trait]
    impl MetadataFetcher for MockFetcher {
        async fn fetch(&self, movie_id: u32) -> std::result::Result<MetadataRecord, FetchError> {
            if self.failing.contains(&movie_id) {
                return Err(FetchError::Status {
                    movie_id,
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            if self.slow.contains(&movie_id) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.panicking.contains(&movie_id) {
                panic!("mock fetcher exploded for {movie_id}");
            }
            Ok(MetadataRecord {
                poster_url: format!("https://img.test/{movie_id}.jpg"),
                overview: format!("Overview for {movie_id}"),
                release_date: "2000-01-01".to_string(),
                rating: "7.5".to_string(),
                genres: "Drama".to_string(),
                detail_link: self.detail_link(movie_id),
            })
        }

        fn detail_link(&self, movie_id: u32) -> String {
            format!("https://movies.test/{movie_id}")
        }
    }

    fn build_test_service(fetcher: MockFetcher) -> RecommendationService {
        let config = ServiceConfig {
            enrichment_timeout_ms: 100,
            ..ServiceConfig::default()
        };
        RecommendationService::new(build_test_data_index(), Arc::new(fetcher), config)
    }

    // ============================================================================
    // get_recommendations
    // ============================================================================

    #[tokio::test]
    async fn test_returns_five_enriched_in_rank_order() {
        let service = build_test_service(MockFetcher::default());

        let response = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)"))
            .await
            .expect("recommendation failed");

        let ids: Vec<u32> = response.recommendations.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![101, 102, 103, 104, 105]);
        assert!(response.warnings.is_empty());
        assert_eq!(response.degraded_count(), 0);

        let first = &response.recommendations[0];
        assert_eq!(first.title, "Aliens (1986)");
        assert_eq!(first.overview, "Overview for 101");
        assert!((first.score - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_only_its_card() {
        // The third-ranked neighbour of Avatar is movie 103
        let fetcher = MockFetcher {
            failing: HashSet::from([103]),
            ..Default::default()
        };
        let service = build_test_service(fetcher);

        let response = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)"))
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 5);
        assert_eq!(response.degraded_count(), 1);

        let third = &response.recommendations[2];
        assert_eq!(third.movie_id, 103);
        assert!(!third.enriched);
        assert_eq!(third.overview, NO_OVERVIEW);
        assert_eq!(third.poster_url, "N/A");
        assert_eq!(third.detail_link, "https://movies.test/103");

        for (i, rec) in response.recommendations.iter().enumerate() {
            if i != 2 {
                assert!(rec.enriched, "card {} should be enriched", i);
                assert_eq!(rec.overview, format!("Overview for {}", rec.movie_id));
            }
        }
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out_to_placeholder() {
        let fetcher = MockFetcher {
            slow: HashSet::from([101]),
            ..Default::default()
        };
        let service = build_test_service(fetcher);

        let started = Instant::now();
        let response = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)"))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!response.recommendations[0].enriched);
        assert!(response.recommendations[1].enriched);
    }

    #[tokio::test]
    async fn test_panicking_fetch_is_isolated() {
        let fetcher = MockFetcher {
            panicking: HashSet::from([105]),
            ..Default::default()
        };
        let service = build_test_service(fetcher);

        let response = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)"))
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 5);
        assert!(!response.recommendations[4].enriched);
        assert_eq!(response.degraded_count(), 1);
    }

    #[tokio::test]
    async fn test_excluded_title_still_recommends_with_warning() {
        let service = build_test_service(MockFetcher::default());

        // Avatar is not a Drama, so the selection hides it
        let filters = FilterSelection::new(Some(Genre::Drama), None);
        let response = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)").with_filters(filters))
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 5);
        assert_eq!(response.warnings.len(), 1);
        assert_eq!(response.warnings[0].title, "Avatar (2009)");
        assert!(response.warnings[0]
            .to_string()
            .starts_with("Selected movie is excluded by current filters"));

        // Ranking is unaffected by the filters
        let unfiltered = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)"))
            .await
            .unwrap();
        let ids = |r: &RecommendationResponse| {
            r.recommendations.iter().map(|c| c.movie_id).collect::<Vec<_>>()
        };
        assert_eq!(ids(&response), ids(&unfiltered));
    }

    #[tokio::test]
    async fn test_admitted_title_has_no_warning() {
        let service = build_test_service(MockFetcher::default());

        let filters = FilterSelection::new(Some(Genre::SciFi), Some(ReleaseYear::Known(2009)));
        let response = service
            .get_recommendations(RecommendationRequest::new("Avatar (2009)").with_filters(filters))
            .await
            .unwrap();

        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_title_is_not_found() {
        let service = build_test_service(MockFetcher::default());

        let err = service
            .get_recommendations(RecommendationRequest::new("Avatar"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Recommend(RecommendError::NotFound { ref title }) if title == "Avatar"
        ));
    }

    #[tokio::test]
    async fn test_limit_overrides_default_count() {
        let service = build_test_service(MockFetcher::default());

        let response = service
            .get_recommendations(RecommendationRequest::new("Heat (1995)").with_limit(2))
            .await
            .unwrap();

        // Row 4 ties 3 and 5 at 0.9; catalog order breaks the tie
        let ids: Vec<u32> = response.recommendations.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![103, 105]);
    }

    // ============================================================================
    // Search, selectors and feedback
    // ============================================================================

    #[test]
    fn test_resolve_query() {
        let service = build_test_service(MockFetcher::default());

        assert_eq!(service.resolve_query("toy story").unwrap().title, "Toy Story (1995)");
        assert!(matches!(
            service.resolve_query("  "),
            Err(ServiceError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_selector_values() {
        let service = build_test_service(MockFetcher::default());

        assert_eq!(
            service.genres(),
            vec![
                Genre::Action,
                Genre::Animation,
                Genre::Comedy,
                Genre::Drama,
                Genre::Horror,
                Genre::Romance,
                Genre::SciFi,
                Genre::Thriller,
            ]
        );
        assert_eq!(
            service.release_years(),
            vec![
                ReleaseYear::Known(1986),
                ReleaseYear::Known(1995),
                ReleaseYear::Known(1997),
                ReleaseYear::Known(2009),
            ]
        );
    }

    #[test]
    fn test_titles_respect_filters() {
        let service = build_test_service(MockFetcher::default());

        let filters = FilterSelection::new(Some(Genre::Animation), Some(ReleaseYear::Known(2009)));
        assert_eq!(service.titles(&filters).unwrap(), vec!["Up (2009)"]);
        assert_eq!(service.titles(&FilterSelection::default()).unwrap().len(), 7);
    }

    #[test]
    fn test_feedback_validation() {
        let service = build_test_service(MockFetcher::default());

        let ack = service
            .submit_feedback(Feedback {
                rating: 10,
                comment: Some("Great picks".to_string()),
            })
            .unwrap();
        assert_eq!(ack.message, FEEDBACK_THANKS);

        assert!(service
            .submit_feedback(Feedback {
                rating: 0,
                comment: None
            })
            .is_ok());
        assert!(matches!(
            service.submit_feedback(Feedback {
                rating: 11,
                comment: None
            }),
            Err(ServiceError::InvalidFeedback { rating: 11 })
        ));
    }

    #[test]
    fn test_overview_excerpt() {
        let mut rec = Recommendation {
            movie_id: 1,
            title: "Amélie (2001)".to_string(),
            poster_url: String::new(),
            overview: "Amélie é".to_string(),
            release_date: String::new(),
            rating: String::new(),
            genres: String::new(),
            detail_link: String::new(),
            score: 0.5,
            enriched: true,
        };

        assert_eq!(rec.overview_excerpt(4), "Amél...");
        assert_eq!(rec.overview_excerpt(8), "Amélie é");

        rec.overview = "x".repeat(200);
        assert_eq!(rec.overview_excerpt(150).chars().count(), 153);
    }
}
