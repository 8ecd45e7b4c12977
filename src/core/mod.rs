// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::is_eligible;
pub use matcher::{ProfileScorer, MatchResult};
pub use scoring::{calculate_match_score, calculate_score};
