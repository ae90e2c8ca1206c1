//! # Data Loader Crate
//!
//! This crate loads the movie catalog and its precomputed similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, Catalog, SimilarityMatrix, DataIndex)
//! - **parser**: Read and write the on-disk artifacts
//! - **index**: Build secondary indices and validate the loaded state
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! // Load catalog + matrix once at startup
//! let index = DataIndex::load_from_files(Path::new("data/model"))?;
//!
//! let movie = index.catalog().find_by_title("Avatar").unwrap();
//! let row = index.similarity().row(movie.index).unwrap();
//!
//! println!("{} has {} similarity scores", movie.title, row.len());
//! ```
//!
//! Loading is all-or-nothing: a missing file, a malformed line or a matrix
//! whose dimension differs from the catalog size is a `DataLoadError`.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{CATALOG_FILE, SIMILARITY_FILE};
pub use types::{
    // Type aliases
    MovieId,
    MovieIndex,
    // Core types
    MovieRecord,
    Catalog,
    SimilarityMatrix,
    DataIndex,
    // Enums
    Genre,
    ReleaseYear,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
        assert!(catalog.available_genres().is_empty());
    }

    #[test]
    fn test_insert_movie() {
        let mut catalog = Catalog::new();

        let index = catalog.insert_movie(862, "Toy Story (1995)", "animation comedy family");
        catalog.build_secondary_indices();

        let movie = catalog.get(index).unwrap();
        assert_eq!(movie.index, 0);
        assert_eq!(movie.movie_id, 862);
        assert_eq!(movie.release_year, ReleaseYear::Known(1995));
        assert_eq!(movie.genres(), vec![Genre::Animation, Genre::Comedy]);
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first() {
        let mut catalog = Catalog::new();
        catalog.insert_movie(1, "Heat", "crime");
        catalog.insert_movie(2, "Heat", "thriller");
        catalog.insert_movie(3, "Ronin", "action");

        assert_eq!(catalog.index_of("Heat"), Some(0));
        assert_eq!(catalog.find_by_title("Heat").unwrap().movie_id, 1);
        assert_eq!(catalog.duplicate_titles(), vec!["Heat"]);
    }

    #[test]
    fn test_empty_queries() {
        let catalog = Catalog::new();

        assert!(catalog.get(999).is_none());
        assert!(catalog.find_by_title("Nonexistent Movie").is_none());
        assert!(catalog.get_movies_by_genre(Genre::Action).is_empty());
        assert!(catalog.get_movies_by_year(ReleaseYear::Unknown).is_empty());
    }

    #[test]
    fn test_from_records_rejects_gaps() {
        let record = MovieRecord {
            index: 4,
            movie_id: 1,
            title: "Out of place".to_string(),
            tags: String::new(),
            release_year: ReleaseYear::Unknown,
        };
        assert!(matches!(
            Catalog::from_records(vec![record]),
            Err(DataLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_genre_parsing() {
        assert_eq!("Sci-Fi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!("scifi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!("ACTION".parse::<Genre>().unwrap(), Genre::Action);
        assert!("Western".parse::<Genre>().is_err());
        assert_eq!(Genre::SciFi.to_string(), "Sci-fi");
    }

    #[test]
    fn test_release_year_parsing_and_order() {
        assert_eq!("1995".parse::<ReleaseYear>().unwrap(), ReleaseYear::Known(1995));
        assert_eq!("unknown".parse::<ReleaseYear>().unwrap(), ReleaseYear::Unknown);
        assert!("95".parse::<ReleaseYear>().is_err());
        assert!(ReleaseYear::Known(2020) < ReleaseYear::Unknown);
        assert_eq!(ReleaseYear::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_mentions_genre_is_substring_match() {
        let mut catalog = Catalog::new();
        catalog.insert_movie(1, "Mix", "romanticcomedy drama");
        let movie = catalog.get(0).unwrap();

        assert!(movie.mentions_genre(Genre::Comedy));
        assert!(!movie.genres().contains(&Genre::Comedy));
    }

    #[test]
    fn test_similarity_matrix_rows() {
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.1],
            vec![0.5, 1.0, 0.3],
            vec![0.1, 0.3, 1.0],
        ])
        .unwrap();

        assert_eq!(matrix.dimension(), 3);
        assert_eq!(matrix.row(1).unwrap(), &[0.5, 1.0, 0.3]);
        assert_eq!(matrix.score(2, 0), Some(0.1));
        assert!(matrix.row(3).is_none());
        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_data_index_dimension_check() {
        let mut catalog = Catalog::new();
        catalog.insert_movie(1, "Only", "");
        let matrix = SimilarityMatrix::new(2, vec![1.0; 4]).unwrap();

        assert!(matches!(
            DataIndex::new(catalog, matrix),
            Err(DataLoadError::DimensionMismatch { catalog: 1, matrix: 2 })
        ));
    }
}
