//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate contains the `RecommendationService` that ties title search,
//! similarity ranking and metadata enrichment into one request, plus its
//! environment-driven configuration.

pub mod config;
pub mod orchestrator;

pub use config::ServiceConfig;
pub use orchestrator::{
    Feedback, FeedbackAck, FilterExclusionWarning, Recommendation, RecommendationRequest,
    RecommendationResponse, RecommendationService, Result, ServiceError, FEEDBACK_THANKS,
};
