//! Similarity Source - nearest neighbours from the precomputed matrix
//!
//! "Movies most similar to the one you picked"
//!
//! ## Algorithm
//! 1. Resolve the title to its catalog index (exact match, first occurrence)
//! 2. Read that movie's row of the similarity matrix
//! 3. Stable sort the (index, score) pairs by score, highest first
//!    - equal scores keep catalog order
//!    - NaN scores sink to the bottom
//! 4. Drop the query movie itself and keep the next `k`
//! 5. Map indices back to movie records

use crate::types::{RankedMovie, RecommendError, Result};
use data_loader::{DataIndex, MovieIndex};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Retrieves the top-K most similar movies for a query title
#[derive(Clone)]
pub struct SimilarityRecommender {
    /// Shared reference to the loaded data (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,
}

impl SimilarityRecommender {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    /// Top `k` neighbours of the movie titled `title`.
    ///
    /// Returns fewer than `k` results when the catalog is too small.
    #[instrument(skip(self))]
    pub fn recommend(&self, title: &str, k: usize) -> Result<Vec<RankedMovie>> {
        let index = self
            .data_index
            .catalog()
            .index_of(title)
            .ok_or_else(|| RecommendError::NotFound {
                title: title.to_string(),
            })?;

        self.recommend_index(index, k)
    }

    /// Top `k` neighbours of the movie at `index`
    pub fn recommend_index(&self, index: MovieIndex, k: usize) -> Result<Vec<RankedMovie>> {
        let catalog = self.data_index.catalog();
        let row = self
            .data_index
            .similarity()
            .row(index)
            .ok_or(RecommendError::IndexOutOfRange {
                index,
                len: catalog.len(),
            })?;

        let recommendations: Vec<RankedMovie> = rank_row(row)
            .into_iter()
            .filter(|&(candidate, _)| candidate != index)
            .take(k)
            .filter_map(|(candidate, score)| {
                catalog.get(candidate).map(|movie| RankedMovie {
                    movie: movie.clone(),
                    score,
                })
            })
            .collect();

        debug!(
            "Selected {} neighbours for index {} (requested {})",
            recommendations.len(),
            index,
            k
        );
        Ok(recommendations)
    }
}

/// Pair every score with its candidate index and sort, best first.
///
/// `par_sort_by` is a stable sort, so ties keep catalog order.
pub fn rank_row(row: &[f32]) -> Vec<(MovieIndex, f32)> {
    let mut ranked: Vec<(MovieIndex, f32)> = row.iter().copied().enumerate().collect();
    ranked.par_sort_by(|a, b| compare_scores(a.1, b.1));
    ranked
}

/// Descending order over scores with NaN ranked last.
///
/// A total order, so sorting never panics and stays deterministic.
pub fn compare_scores(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
