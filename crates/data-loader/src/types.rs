//! Core domain types for the movie catalog and its similarity matrix.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (MovieId, MovieIndex)
//! - Enums for fixed sets of values (Genre, ReleaseYear)
//! - Flat, row-major storage for a dense matrix
//! - HashMap and BTreeMap for efficient lookups

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// External metadata key of a movie (the TMDB movie id)
pub type MovieId = u32;

/// Zero-based position of a movie in the catalog.
///
/// Row `i` of the similarity matrix belongs to the movie at index `i`.
pub type MovieIndex = usize;

// =============================================================================
// Genre vocabulary
// =============================================================================

/// The fixed set of genre words recognised in a movie's tags.
///
/// Rust concept: the vocabulary is an enum rather than free text, so the
/// genre selector always offers the same, deterministic set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Animation,
    Comedy,
    Drama,
    Horror,
    Romance,
    SciFi,
    Thriller,
}

impl Genre {
    /// Every recognised genre, in display-name order
    pub const ALL: [Genre; 8] = [
        Genre::Action,
        Genre::Animation,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
    ];

    /// Lower-case word as it appears in the tag bag (e.g. "sci-fi")
    pub fn token(&self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Animation => "animation",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Horror => "horror",
            Genre::Romance => "romance",
            Genre::SciFi => "sci-fi",
            Genre::Thriller => "thriller",
        }
    }

    /// Capitalised name shown in the genre selector (e.g. "Sci-fi")
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-fi",
            Genre::Thriller => "Thriller",
        }
    }

    /// Match a single tag word against the vocabulary (case-insensitive)
    pub fn from_token(word: &str) -> Option<Genre> {
        let word = word.to_lowercase();
        Genre::ALL.into_iter().find(|genre| genre.token() == word)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Genre {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "scifi" | "sci fi" => Ok(Genre::SciFi),
            other => Genre::from_token(other).ok_or_else(|| DataLoadError::InvalidValue {
                field: "genre".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Release year
// =============================================================================

/// Release year derived from a "(1995)"-style suffix in the title.
///
/// Known years order before `Unknown`, matching the year selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReleaseYear {
    Known(u16),
    Unknown,
}

impl ReleaseYear {
    pub fn year(&self) -> Option<u16> {
        match self {
            ReleaseYear::Known(year) => Some(*year),
            ReleaseYear::Unknown => None,
        }
    }
}

impl From<Option<u16>> for ReleaseYear {
    fn from(year: Option<u16>) -> Self {
        year.map(ReleaseYear::Known).unwrap_or(ReleaseYear::Unknown)
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseYear::Known(year) => write!(f, "{:04}", year),
            ReleaseYear::Unknown => f.write_str("Unknown"),
        }
    }
}

impl FromStr for ReleaseYear {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unknown") {
            return Ok(ReleaseYear::Unknown);
        }
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(year) = s.parse::<u16>() {
                return Ok(ReleaseYear::Known(year));
            }
        }
        Err(DataLoadError::InvalidValue {
            field: "release_year".to_string(),
            value: s.to_string(),
        })
    }
}

// =============================================================================
// Movie records
// =============================================================================

/// One entry of the catalog. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Position in the catalog (and row in the similarity matrix)
    pub index: MovieIndex,
    /// External metadata key
    pub movie_id: MovieId,
    /// Lookup key; expected to be unique but not guaranteed
    pub title: String,
    /// Space-delimited keyword bag
    pub tags: String,
    pub release_year: ReleaseYear,
}

impl MovieRecord {
    /// Genres whose word appears in the tag bag
    pub fn genres(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .tags
            .split_whitespace()
            .filter_map(Genre::from_token)
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// Substring check used by the genre filter
    pub fn mentions_genre(&self, genre: Genre) -> bool {
        self.tags.to_lowercase().contains(genre.token())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The fixed collection of known movies, plus lookup indices.
///
/// Rust concepts demonstrated:
/// - `Vec<T>` as primary storage, addressed by `MovieIndex`
/// - HashMap for O(1) title lookups
/// - BTreeMap for sorted selector values
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,

    /// Title -> index of the first record carrying that title
    pub(crate) title_index: HashMap<String, MovieIndex>,

    // Secondary indices for the filter selectors
    pub(crate) genre_index: BTreeMap<Genre, Vec<MovieIndex>>,
    pub(crate) year_index: BTreeMap<ReleaseYear, Vec<MovieIndex>>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from parsed records.
    ///
    /// Records must be in index order, starting at zero.
    pub fn from_records(records: Vec<MovieRecord>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for record in records {
            if record.index != catalog.movies.len() {
                return Err(DataLoadError::ValidationError(format!(
                    "record '{}' has index {} but belongs at position {}",
                    record.title,
                    record.index,
                    catalog.movies.len()
                )));
            }
            catalog.push(record);
        }
        catalog.build_secondary_indices();
        Ok(catalog)
    }

    /// Append a movie at the next index and return that index.
    ///
    /// Call `build_secondary_indices` once all movies are inserted.
    pub fn insert_movie(
        &mut self,
        movie_id: MovieId,
        title: impl Into<String>,
        tags: impl Into<String>,
    ) -> MovieIndex {
        let title = title.into();
        let record = MovieRecord {
            index: self.movies.len(),
            movie_id,
            release_year: crate::parser::extract_year_from_title(&title).into(),
            title,
            tags: tags.into(),
        };
        let index = record.index;
        self.push(record);
        index
    }

    fn push(&mut self, record: MovieRecord) {
        // First record wins when titles repeat
        self.title_index
            .entry(record.title.clone())
            .or_insert(record.index);
        self.movies.push(record);
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by catalog index
    pub fn get(&self, index: MovieIndex) -> Option<&MovieRecord> {
        self.movies.get(index)
    }

    /// Resolve a title to its index by exact match
    pub fn index_of(&self, title: &str) -> Option<MovieIndex> {
        self.title_index.get(title).copied()
    }

    /// Get a movie by exact title
    pub fn find_by_title(&self, title: &str) -> Option<&MovieRecord> {
        self.index_of(title).and_then(|index| self.get(index))
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// All titles in catalog order (the dropdown list)
    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.title.as_str()).collect()
    }

    /// Get all movies whose tags name a genre as a whole word
    pub fn get_movies_by_genre(&self, genre: Genre) -> &[MovieIndex] {
        self.genre_index
            .get(&genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all movies released in a specific year
    pub fn get_movies_by_year(&self, year: ReleaseYear) -> &[MovieIndex] {
        self.year_index
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Values for the genre selector: recognised genres present in the catalog
    pub fn available_genres(&self) -> Vec<Genre> {
        self.genre_index.keys().copied().collect()
    }

    /// Values for the year selector, ascending, `Unknown` last
    pub fn release_years(&self) -> Vec<ReleaseYear> {
        self.year_index.keys().copied().collect()
    }

    /// Titles that appear more than once, in order of first appearance
    pub fn duplicate_titles(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for movie in &self.movies {
            let count = seen.entry(movie.title.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(movie.title.as_str());
            }
        }
        duplicates
    }
}

// =============================================================================
// Similarity matrix
// =============================================================================

/// Dense N x N matrix of precomputed similarity scores, stored row-major.
///
/// Symmetry is conventional, not enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Wrap row-major scores, checking that there are exactly `dimension^2` of them
    pub fn new(dimension: usize, scores: Vec<f32>) -> Result<Self> {
        let expected = dimension
            .checked_mul(dimension)
            .ok_or_else(|| DataLoadError::InvalidValue {
                field: "dimension".to_string(),
                value: dimension.to_string(),
            })?;
        if scores.len() != expected {
            return Err(DataLoadError::ValidationError(format!(
                "similarity matrix of dimension {} needs {} scores, got {}",
                dimension,
                expected,
                scores.len()
            )));
        }
        Ok(Self { dimension, scores })
    }

    /// Build from nested rows; every row must be as long as there are rows
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(DataLoadError::ValidationError(format!(
                    "row {} has {} scores, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            scores.extend(row);
        }
        Self::new(dimension, scores)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Similarity of item `index` to every item, itself included
    pub fn row(&self, index: MovieIndex) -> Option<&[f32]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn score(&self, from: MovieIndex, to: MovieIndex) -> Option<f32> {
        self.row(from).and_then(|row| row.get(to).copied())
    }

    /// Row-major view of every score
    pub fn as_slice(&self) -> &[f32] {
        &self.scores
    }
}

// =============================================================================
// DataIndex - catalog and matrix loaded together
// =============================================================================

/// Everything loaded at startup: the catalog and its similarity matrix.
///
/// Construction checks that the matrix dimension equals the catalog size, so
/// a `DataIndex` that exists is always consistent. It is never mutated after
/// construction and is shared as `Arc<DataIndex>`.
#[derive(Debug)]
pub struct DataIndex {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl DataIndex {
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != similarity.dimension() {
            return Err(DataLoadError::DimensionMismatch {
                catalog: catalog.len(),
                matrix: similarity.dimension(),
            });
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// (movies, matrix dimension) for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.catalog.len(), self.similarity.dimension())
    }
}
