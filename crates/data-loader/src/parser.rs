//! Parsers for the two load-time artifacts.
//!
//! - `movie_list.dat`: `movieId::title::tags`, one movie per line
//! - `similarity.bin`: `u64` dimension N (little-endian), then N*N `f32` scores, row-major
//!
//! Both formats are read once at startup; anything unexpected is an error.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Size of the dimension header in the similarity blob
const HEADER_LEN: usize = std::mem::size_of::<u64>();

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = open_file(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Read a text file as lines, accepting UTF-8 or ISO-8859-1 (Latin-1).
///
/// Exported catalogs are usually UTF-8; older dumps are Latin-1, where each
/// byte maps directly to the Unicode code point of the same value.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = read_bytes(path)?;
    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the catalog file
///
/// Format: movieId::title::tags
///
/// Records are numbered in file order; blank lines are skipped and do not
/// consume an index. The tags field may be empty but must be present.
pub fn parse_catalog(path: &Path) -> Result<Vec<MovieRecord>> {
    let file = file_label(path);
    let lines = read_lines(path)?;
    let mut movies = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let parse_error = |reason: String| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason,
        };

        let mut parts = line.splitn(3, "::");

        let movie_id = parts
            .next()
            .ok_or_else(|| parse_error("Missing movieId".to_string()))?;
        let title = parts
            .next()
            .ok_or_else(|| parse_error("Missing title".to_string()))?;
        let tags = parts
            .next()
            .ok_or_else(|| parse_error("Missing tags".to_string()))?;

        let title = title.trim();
        if title.is_empty() {
            return Err(parse_error("Empty title".to_string()));
        }

        movies.push(MovieRecord {
            index: movies.len(),
            movie_id: movie_id
                .trim()
                .parse()
                .map_err(|e| parse_error(format!("Invalid movieId: {}", e)))?,
            title: title.to_string(),
            tags: tags.trim().to_string(),
            release_year: extract_year_from_title(title).into(),
        });
    }

    Ok(movies)
}

/// Parse the similarity matrix blob
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_bytes(path)?;
    let corrupt = |reason: String| DataLoadError::CorruptMatrix {
        path: path.display().to_string(),
        reason,
    };

    if bytes.len() < HEADER_LEN {
        return Err(corrupt(format!(
            "expected at least {} header bytes, found {}",
            HEADER_LEN,
            bytes.len()
        )));
    }

    let (header, body) = bytes.split_at(HEADER_LEN);
    let mut dimension_bytes = [0u8; HEADER_LEN];
    dimension_bytes.copy_from_slice(header);
    let dimension = usize::try_from(u64::from_le_bytes(dimension_bytes))
        .map_err(|_| corrupt("dimension does not fit in memory".to_string()))?;

    let expected = dimension
        .checked_mul(dimension)
        .and_then(|cells| cells.checked_mul(4))
        .ok_or_else(|| corrupt(format!("dimension {} is too large", dimension)))?;
    if body.len() != expected {
        return Err(corrupt(format!(
            "dimension {} needs {} score bytes, found {}",
            dimension,
            expected,
            body.len()
        )));
    }

    let scores = body
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    SimilarityMatrix::new(dimension, scores)
}

/// Write a matrix in the format `parse_similarity` reads
pub fn write_similarity(path: &Path, matrix: &SimilarityMatrix) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&(matrix.dimension() as u64).to_le_bytes())?;
    for score in matrix.as_slice() {
        writer.write_all(&score.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Extract the release year from a movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Avatar" -> None
///
/// The first parenthesised group of exactly four digits wins.
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    let bytes = title.as_bytes();
    bytes.windows(6).find_map(|window| {
        let is_year = window[0] == b'('
            && window[5] == b')'
            && window[1..5].iter().all(|b| b.is_ascii_digit());
        if is_year {
            std::str::from_utf8(&window[1..5]).ok()?.parse().ok()
        } else {
            None
        }
    })
}
