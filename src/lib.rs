//! Founder Match - candidate ranking service for the co-founder matching platform
//!
//! The core is [`ProfileScorer`], a fixed weighted-sum heuristic that orders
//! unseen founder profiles by compatibility with the viewer. Around it sit the
//! HTTP routes, the hosted store client and the PostgreSQL swipe store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ProfileScorer, MatchResult, calculate_score};
pub use models::{FounderProfile, YesNo, ScoredCandidate, SwipeAction, FindCandidatesRequest, FindCandidatesResponse};
