use std::collections::HashSet;

use crate::models::FounderProfile;

/// Check if a candidate may be shown to the viewer at all
///
/// Drops the viewer's own profile, deactivated profiles and anything the
/// viewer has already liked or skipped.
#[inline]
pub fn is_eligible(
    candidate: &FounderProfile,
    viewer_id: &str,
    excluded: &HashSet<String>,
) -> bool {
    if candidate.user_id == viewer_id {
        return false;
    }

    if !candidate.is_active {
        return false;
    }

    !excluded.contains(&candidate.user_id)
}
