//! Fetcher that never leaves the process.

use crate::{FetchError, MetadataFetcher, MetadataRecord};
use async_trait::async_trait;

/// Answers every fetch with placeholders; used when enrichment is switched off
#[derive(Debug, Clone)]
pub struct OfflineFetcher {
    site_url: String,
}

impl OfflineFetcher {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
        }
    }
}

impl Default for OfflineFetcher {
    fn default() -> Self {
        Self::new(crate::tmdb::DEFAULT_SITE_URL)
    }
}

#[async_trait]
impl MetadataFetcher for OfflineFetcher {
    async fn fetch(&self, movie_id: u32) -> Result<MetadataRecord, FetchError> {
        Ok(self.placeholder(movie_id))
    }

    fn detail_link(&self, movie_id: u32) -> String {
        format!("{}/{}", self.site_url.trim_end_matches('/'), movie_id)
    }

    fn is_live(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NO_OVERVIEW;

    #[tokio::test]
    async fn test_offline_fetch_is_placeholder() {
        let fetcher = OfflineFetcher::default();
        let record = fetcher.fetch(603).await.unwrap();

        assert_eq!(record.overview, NO_OVERVIEW);
        assert_eq!(record.detail_link, "https://www.themoviedb.org/movie/603");
        assert!(!fetcher.is_live());
    }
}
