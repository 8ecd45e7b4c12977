use std::collections::HashSet;

use crate::models::{FounderProfile, YesNo};

pub const TECHNICAL_WEIGHT: u32 = 5;
pub const CITY_WEIGHT: u32 = 4;
pub const COUNTRY_WEIGHT: u32 = 3;
pub const PRIORITY_AREA_WEIGHT: u32 = 3;
pub const STARTUP_WEIGHT: u32 = 2;

/// Calculate the compatibility score of `candidate` for `viewer`
///
/// Scoring formula:
/// score = (
///     technical_match * 5 +        # Same answer to "are you technical?"
///     same_city * 4 +              # Case-insensitive
///     same_country * 3 +           # Case-insensitive
///     shared_priority_areas * 3 +  # Per distinct shared tag, case-sensitive
///     startup_match * 2            # Same answer to "have you had a startup?"
/// )
///
/// Absent attributes never match. Returns the score together with the shared
/// priority areas in the viewer's order.
pub fn calculate_match_score(
    candidate: &FounderProfile,
    viewer: &FounderProfile,
) -> (u32, Vec<String>) {
    let shared = shared_priority_areas(&viewer.priority_areas, &candidate.priority_areas);

    let score = answer_match(viewer.is_technical, candidate.is_technical) * TECHNICAL_WEIGHT
        + binary_match(viewer.city.as_deref(), candidate.city.as_deref()) * CITY_WEIGHT
        + binary_match(viewer.country.as_deref(), candidate.country.as_deref()) * COUNTRY_WEIGHT
        + shared.len() as u32 * PRIORITY_AREA_WEIGHT
        + answer_match(viewer.has_startup, candidate.has_startup) * STARTUP_WEIGHT;

    (score, shared)
}

/// Score only, see [`calculate_match_score`]
#[inline]
pub fn calculate_score(candidate: &FounderProfile, viewer: &FounderProfile) -> u32 {
    calculate_match_score(candidate, viewer).0
}

/// 1 when both values are present and equal ignoring case, else 0
#[inline]
pub fn binary_match(a: Option<&str>, b: Option<&str>) -> u32 {
    match (a, b) {
        (Some(a), Some(b)) if a.to_lowercase() == b.to_lowercase() => 1,
        _ => 0,
    }
}

/// 1 when both questions were answered and the answers agree, else 0
#[inline]
pub fn answer_match(a: Option<YesNo>, b: Option<YesNo>) -> u32 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1,
        _ => 0,
    }
}

/// Distinct viewer tags that the candidate also lists, in viewer order
pub fn shared_priority_areas(viewer: &[String], candidate: &[String]) -> Vec<String> {
    let candidate_tags: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    viewer
        .iter()
        .filter(|tag| candidate_tags.contains(tag.as_str()) && seen.insert(tag.as_str()))
        .cloned()
        .collect()
}
