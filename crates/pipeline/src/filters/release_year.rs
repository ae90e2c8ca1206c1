//! Filter to keep only movies from one release year.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, MovieIndex, ReleaseYear};

/// Keeps movies whose derived release year equals the selection.
///
/// Selecting `ReleaseYear::Unknown` keeps the movies without a year in
/// their title.
pub struct YearFilter {
    year: ReleaseYear,
}

impl YearFilter {
    pub fn new(year: ReleaseYear) -> Self {
        Self { year }
    }
}

impl Filter for YearFilter {
    fn name(&self) -> &str {
        "YearFilter"
    }

    fn apply(
        &self,
        candidates: Vec<MovieIndex>,
        catalog: &Catalog,
    ) -> Result<Vec<MovieIndex>> {
        let filtered: Vec<MovieIndex> = candidates
            .into_iter()
            .filter(|&index| {
                catalog
                    .get(index)
                    .map(|movie| movie.release_year == self.year)
                    .unwrap_or(false)
            })
            .collect();
        Ok(filtered)
    }
}
