// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FounderProfile, YesNo, Swipe, SwipeAction, ScoredCandidate};
pub use requests::{FindCandidatesRequest, RecordSwipeRequest};
pub use responses::{FindCandidatesResponse, HealthResponse, ErrorResponse, RecordSwipeResponse, MatchesResponse};
