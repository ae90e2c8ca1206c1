//! Result and error types for similarity retrieval.

use data_loader::{MovieIndex, MovieRecord};
use thiserror::Error;

/// A neighbour of the query movie together with its similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovie {
    pub movie: MovieRecord,
    pub score: f32,
}

impl RankedMovie {
    pub fn index(&self) -> MovieIndex {
        self.movie.index
    }
}

/// Errors raised while resolving a recommendation query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// No catalog record carries this exact title
    #[error("Movie '{title}' not found in catalog")]
    NotFound { title: String },

    #[error("Catalog index {index} is out of range (catalog has {len} movies)")]
    IndexOutOfRange { index: MovieIndex, len: usize },
}

pub type Result<T> = std::result::Result<T, RecommendError>;
