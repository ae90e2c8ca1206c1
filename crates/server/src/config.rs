use serde::Deserialize;
use std::time::Duration;

/// Service tuning loaded from `RECS_*` environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Recommendations returned when a request does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Upper bound on a single movie's enrichment task
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,

    /// Overview characters shown on a card before "..."
    #[serde(default = "default_overview_excerpt_chars")]
    pub overview_excerpt_chars: usize,
}

fn default_recommendation_count() -> usize {
    5
}

fn default_enrichment_timeout_ms() -> u64 {
    8000
}

fn default_overview_excerpt_chars() -> usize {
    150
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            recommendation_count: default_recommendation_count(),
            enrichment_timeout_ms: default_enrichment_timeout_ms(),
            overview_excerpt_chars: default_overview_excerpt_chars(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("RECS_")
            .from_env::<ServiceConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load service config: {}", e))
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}
