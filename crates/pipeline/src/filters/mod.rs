//! Filter implementations for the catalog pipeline.
//!
//! This module contains the concrete filters behind the sidebar selectors;
//! they compose into a FilterPipeline.

pub mod genre;
pub mod release_year;

// Re-export for convenience
pub use genre::GenreFilter;
pub use release_year::YearFilter;
