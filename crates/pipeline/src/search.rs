//! Fuzzy title search.
//!
//! Maps free-text input to the closest catalog title. Only the resolved
//! title leaves this module; ranking never sees the raw query.

use crate::fuzzy::weighted_ratio;
use data_loader::{DataIndex, MovieIndex};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A catalog title scored against a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub index: MovieIndex,
    pub title: String,
    /// 0-100, higher is closer
    pub score: u8,
}

/// Higher score first, then earlier catalog position
fn match_order(a: &(MovieIndex, u8), b: &(MovieIndex, u8)) -> Ordering {
    b.1.cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Searches catalog titles by string similarity
#[derive(Clone)]
pub struct TitleSearch {
    data_index: Arc<DataIndex>,
}

impl TitleSearch {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    fn score_all(&self, query: &str) -> Vec<(MovieIndex, u8)> {
        self.data_index
            .catalog()
            .movies()
            .par_iter()
            .map(|movie| (movie.index, weighted_ratio(query, &movie.title)))
            .collect()
    }

    fn to_match(&self, (index, score): (MovieIndex, u8)) -> Option<TitleMatch> {
        self.data_index.catalog().get(index).map(|movie| TitleMatch {
            index,
            title: movie.title.clone(),
            score,
        })
    }

    /// The single closest title, or `None` for a blank query or empty catalog.
    ///
    /// Ties go to the title that appears first in the catalog.
    #[instrument(skip(self))]
    pub fn best_match(&self, query: &str) -> Option<TitleMatch> {
        if query.trim().is_empty() {
            return None;
        }
        let best = self
            .score_all(query)
            .into_iter()
            .min_by(match_order)
            .and_then(|scored| self.to_match(scored));

        debug!(?best, "Resolved fuzzy query");
        best
    }

    /// The `limit` closest titles, best first
    pub fn top_matches(&self, query: &str, limit: usize) -> Vec<TitleMatch> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let mut scored = self.score_all(query);
        scored.sort_by(match_order);
        scored
            .into_iter()
            .take(limit)
            .filter_map(|scored| self.to_match(scored))
            .collect()
    }
}
