//! Filter to keep only movies tagged with a genre.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, Genre, MovieIndex};

/// Keeps movies whose tag bag mentions the selected genre.
///
/// ## Algorithm
/// Lower-case the tags and look for the genre token as a substring, so
/// "sci-fi" also matches inside compound tags.
pub struct GenreFilter {
    genre: Genre,
}

impl GenreFilter {
    pub fn new(genre: Genre) -> Self {
        Self { genre }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
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
                    .map(|movie| movie.mentions_genre(self.genre))
                    .unwrap_or(false) // Exclude if movie not found
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_movie(1, "Action Movie", "action adventure");
        catalog.insert_movie(2, "Drama Movie", "drama");
        catalog.insert_movie(3, "Space Movie", "Sci-Fi space");
        catalog.build_secondary_indices();
        catalog
    }

    #[test]
    fn test_genre_filter() {
        let catalog = create_test_catalog();

        let filter = GenreFilter::new(Genre::SciFi);
        let filtered = filter.apply(vec![0, 1, 2], &catalog).unwrap();
        assert_eq!(filtered, vec![2]);
    }

    #[test]
    fn test_genre_filter_drops_unknown_indices() {
        let catalog = create_test_catalog();

        let filter = GenreFilter::new(Genre::Action);
        let filtered = filter.apply(vec![0, 42], &catalog).unwrap();
        assert_eq!(filtered, vec![0]);
    }
}
