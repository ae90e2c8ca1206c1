//! The Filter trait behind the genre and year selectors.

use anyhow::Result;
use data_loader::{Catalog, MovieIndex};

/// Narrows a list of catalog indices.
///
/// Implementations must keep the relative order of the indices they retain,
/// so a pipeline applied to `0..len` yields titles in catalog order.
/// `Send + Sync` lets one pipeline serve concurrent requests.
pub trait Filter: Send + Sync {
    /// Short label used in debug logs
    fn name(&self) -> &str;

    /// Keep the indices in `candidates` that pass this filter
    fn apply(
        &self,
        candidates: Vec<MovieIndex>,
        catalog: &Catalog,
    ) -> Result<Vec<MovieIndex>>;
}
