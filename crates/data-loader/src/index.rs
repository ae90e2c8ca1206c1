//! DataIndex loading and index building.
//!
//! This module builds the in-memory state from the two artifacts:
//! - Parse catalog and matrix in parallel
//! - Build secondary indices (genre_index, year_index)
//! - Validate that the matrix matches the catalog

use crate::error::Result;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Catalog file name inside the data directory
pub const CATALOG_FILE: &str = "movie_list.dat";

/// Similarity matrix file name inside the data directory
pub const SIMILARITY_FILE: &str = "similarity.bin";

impl DataIndex {
    /// Load the catalog and similarity matrix from a directory
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Build the catalog and its secondary indices
    /// 3. Check the matrix dimension against the catalog size
    /// 4. Report duplicate titles and non-finite scores
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog and similarity matrix from {:?}", data_dir);

        let catalog_path = data_dir.join(CATALOG_FILE);
        let similarity_path = data_dir.join(SIMILARITY_FILE);

        // The matrix is by far the larger file; read both at once
        let (movies, similarity) = rayon::join(
            || parser::parse_catalog(&catalog_path),
            || parser::parse_similarity(&similarity_path),
        );
        let movies = movies?;
        let similarity = similarity?;

        info!(
            "Loaded {} movies and a {}x{} similarity matrix",
            movies.len(),
            similarity.dimension(),
            similarity.dimension()
        );

        let catalog = Catalog::from_records(movies)?;
        let index = DataIndex::new(catalog, similarity)?;
        index.report_anomalies();

        info!("DataIndex successfully built and validated!");
        Ok(index)
    }

    /// Log data quirks that do not prevent serving
    fn report_anomalies(&self) {
        let duplicates = self.catalog().duplicate_titles();
        if !duplicates.is_empty() {
            warn!(
                count = duplicates.len(),
                first = duplicates[0],
                "Catalog contains duplicate titles; lookups resolve to the first occurrence"
            );
        }

        let non_finite = self.count_non_finite_scores();
        if non_finite > 0 {
            warn!(
                count = non_finite,
                "Similarity matrix contains non-finite scores; they rank last"
            );
        }
    }

    /// Number of NaN or infinite scores in the matrix
    pub fn count_non_finite_scores(&self) -> usize {
        let matrix = self.similarity();
        (0..matrix.dimension())
            .into_par_iter()
            .map(|i| {
                matrix
                    .row(i)
                    .map(|row| row.iter().filter(|s| !s.is_finite()).count())
                    .unwrap_or(0)
            })
            .sum()
    }
}

impl Catalog {
    /// Build secondary indices after all movies are inserted
    ///
    /// This creates the genre_index and year_index for the filter selectors
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        self.year_index.clear();

        for movie in &self.movies {
            for genre in movie.genres() {
                self.genre_index
                    .entry(genre)
                    .or_insert_with(Vec::new)
                    .push(movie.index);
            }

            self.year_index
                .entry(movie.release_year)
                .or_insert_with(Vec::new)
                .push(movie.index);
        }
    }
}
