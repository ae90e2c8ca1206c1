//! # Recommender Crate
//!
//! Top-K retrieval over a precomputed similarity matrix.
//!
//! Given a movie title, the recommender finds its row in the matrix, ranks
//! every other movie by descending similarity and returns the best `k`.
//! It is a pure function of the loaded `DataIndex`: nothing is mutated and
//! the same query always yields the same answer.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::SimilarityRecommender;
//! use data_loader::DataIndex;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files(Path::new("data/model"))?);
//! let recommender = SimilarityRecommender::new(data_index.clone());
//!
//! for ranked in recommender.recommend("Avatar", 5)? {
//!     println!("{} ({:.3})", ranked.movie.title, ranked.score);
//! }
//! ```

pub mod types;
pub mod similarity;

// Re-export commonly used types
pub use types::{RankedMovie, RecommendError, Result};
pub use similarity::{compare_scores, rank_row, SimilarityRecommender};
