//! Catalog narrowing and title search for movie recommendations.
//!
//! This crate provides:
//! - Filter trait and implementations for the genre and release-year selectors
//! - FilterPipeline for composing filters, FilterSelection for building one
//! - TitleSearch for resolving free-text input to a catalog title
//!
//! ## Architecture
//! Neither stage touches ranking:
//! 1. Filters narrow the list of titles a user may pick from
//! 2. Fuzzy search maps typed text onto the closest title
//! 3. The resolved title is what the recommender ranks against
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterSelection, TitleSearch};
//!
//! let selection = FilterSelection::new(Some(Genre::Comedy), None);
//! let visible = selection.to_pipeline().apply_to_catalog(index.catalog())?;
//!
//! let search = TitleSearch::new(index.clone());
//! let best = search.best_match("dark knight");
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod fuzzy;
pub mod search;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::{FilterPipeline, FilterSelection};
pub use search::{TitleMatch, TitleSearch};
