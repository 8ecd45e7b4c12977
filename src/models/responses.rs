use serde::{Deserialize, Serialize};
use crate::models::domain::{FounderProfile, ScoredCandidate};

/// Response for the candidates endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindCandidatesResponse {
    pub candidates: Vec<ScoredCandidate>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "cacheEntries")]
    pub cache_entries: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record swipe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSwipeResponse {
    pub success: bool,
    #[serde(rename = "isMatch")]
    pub is_match: bool,
}

/// Mutual matches of the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<FounderProfile>,
    pub count: usize,
}
