use std::cmp::Reverse;
use std::collections::HashSet;

use crate::models::{FounderProfile, ScoredCandidate};
use crate::core::{
    filters::is_eligible,
    scoring::{calculate_match_score, calculate_score},
};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Ranks candidate profiles for a viewer
///
/// Stateless; every call is a pure function of its arguments. Candidates with
/// equal scores keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileScorer;

impl ProfileScorer {
    pub fn new() -> Self {
        Self
    }

    /// Compatibility score of `candidate` for `viewer`
    pub fn score(&self, candidate: &FounderProfile, viewer: &FounderProfile) -> u32 {
        calculate_score(candidate, viewer)
    }

    /// Reorder `candidates` from most to least compatible with `viewer`
    pub fn rank(&self, viewer: &FounderProfile, mut candidates: Vec<FounderProfile>) -> Vec<FounderProfile> {
        candidates.sort_by_cached_key(|candidate| Reverse(calculate_score(candidate, viewer)));
        candidates
    }

    /// Filter, rank and truncate candidates for a viewer
    ///
    /// # Arguments
    /// * `viewer` - The requesting user's profile
    /// * `candidates` - Candidate profiles loaded from the store
    /// * `excluded` - Profile ids the viewer already swiped on
    /// * `limit` - Maximum number of candidates to return
    pub fn find_matches(
        &self,
        viewer: &FounderProfile,
        candidates: Vec<FounderProfile>,
        excluded: &HashSet<String>,
        limit: usize,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let mut scored: Vec<(FounderProfile, u32, Vec<String>)> = candidates
            .into_iter()
            .filter(|profile| is_eligible(profile, &viewer.user_id, excluded))
            .map(|profile| {
                let (score, shared) = calculate_match_score(&profile, viewer);
                (profile, score, shared)
            })
            .collect();

        // Stable, so ties stay in store order
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        let matches = scored
            .into_iter()
            .map(|(profile, score, shared)| ScoredCandidate::from_profile(profile, score, shared))
            .collect();

        MatchResult {
            matches,
            total_candidates,
        }
    }
}
