//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, and the
//! FilterSelection that builds a pipeline from the sidebar selectors.

use crate::filters::{GenreFilter, YearFilter};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, Genre, MovieIndex, ReleaseYear};
use std::fmt;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(GenreFilter::new(Genre::Comedy))
///     .add_filter(YearFilter::new(ReleaseYear::Known(1995)));
///
/// let visible = pipeline.apply_to_catalog(catalog)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<MovieIndex>)` - The indices that pass every filter
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<MovieIndex>,
        catalog: &Catalog,
    ) -> Result<Vec<MovieIndex>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, catalog)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }

    /// Apply the pipeline to every movie in the catalog
    pub fn apply_to_catalog(&self, catalog: &Catalog) -> Result<Vec<MovieIndex>> {
        self.apply((0..catalog.len()).collect(), catalog)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// The user's sidebar choices; `None` means "All".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub genre: Option<Genre>,
    pub year: Option<ReleaseYear>,
}

impl FilterSelection {
    pub fn new(genre: Option<Genre>, year: Option<ReleaseYear>) -> Self {
        Self { genre, year }
    }

    /// True when no filter is selected
    pub fn is_unfiltered(&self) -> bool {
        self.genre.is_none() && self.year.is_none()
    }

    /// Genre first, then year
    pub fn to_pipeline(&self) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();
        if let Some(genre) = self.genre {
            pipeline = pipeline.add_filter(GenreFilter::new(genre));
        }
        if let Some(year) = self.year {
            pipeline = pipeline.add_filter(YearFilter::new(year));
        }
        pipeline
    }

    /// Whether the movie at `index` survives this selection
    pub fn admits(&self, index: MovieIndex, catalog: &Catalog) -> Result<bool> {
        Ok(!self.to_pipeline().apply(vec![index], catalog)?.is_empty())
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let genre = self
            .genre
            .map(|g| g.to_string())
            .unwrap_or_else(|| "All".to_string());
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "All".to_string());
        write!(f, "genre={}, year={}", genre, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_movie(1, "Funny (1995)", "comedy");
        catalog.insert_movie(2, "Sad (1995)", "drama");
        catalog.insert_movie(3, "Funny Again (2001)", "comedy romance");
        catalog.build_secondary_indices();
        catalog
    }

    #[test]
    fn test_empty_pipeline() {
        let catalog = create_test_catalog();
        let pipeline = FilterPipeline::new();

        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply_to_catalog(&catalog).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_chained_filters() {
        let catalog = create_test_catalog();
        let pipeline = FilterPipeline::new()
            .add_filter(GenreFilter::new(Genre::Comedy))
            .add_filter(YearFilter::new(ReleaseYear::Known(1995)));

        assert_eq!(pipeline.apply_to_catalog(&catalog).unwrap(), vec![0]);
    }

    #[test]
    fn test_selection_admits() {
        let catalog = create_test_catalog();
        let selection = FilterSelection::new(Some(Genre::Comedy), None);

        assert!(selection.admits(0, &catalog).unwrap());
        assert!(!selection.admits(1, &catalog).unwrap());
        assert!(FilterSelection::default().admits(1, &catalog).unwrap());
    }

    #[test]
    fn test_selection_display() {
        let selection = FilterSelection::new(Some(Genre::SciFi), Some(ReleaseYear::Unknown));
        assert_eq!(selection.to_string(), "genre=Sci-fi, year=Unknown");
        assert_eq!(FilterSelection::default().to_string(), "genre=All, year=All");
    }
}
