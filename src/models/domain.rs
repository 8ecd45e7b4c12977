use serde::{Deserialize, Deserializer, Serialize};

/// Yes/no answer used by the optional profile questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Parse a stored answer, ignoring case. Anything else is treated as unanswered.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("yes") {
            Some(YesNo::Yes)
        } else if value.eq_ignore_ascii_case("no") {
            Some(YesNo::No)
        } else {
            None
        }
    }
}

/// Founder profile as stored in the hosted database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FounderProfile {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "avatarUrl", alias = "avatar_url", default)]
    pub avatar_url: Option<String>,
    #[serde(rename = "linkedinUrl", alias = "linkedin_url", default)]
    pub linkedin_url: Option<String>,
    #[serde(rename = "isTechnical", alias = "is_technical", default, deserialize_with = "lenient_yes_no")]
    pub is_technical: Option<YesNo>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "priorityAreas", alias = "priority_areas", default, deserialize_with = "null_as_empty")]
    pub priority_areas: Vec<String>,
    #[serde(rename = "hasStartup", alias = "has_startup", default, deserialize_with = "lenient_yes_no")]
    pub has_startup: Option<YesNo>,
    #[serde(rename = "isActive", alias = "is_active", default = "default_true")]
    pub is_active: bool,
}

impl FounderProfile {
    /// Active profile with every optional attribute unset
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            bio: None,
            avatar_url: None,
            linkedin_url: None,
            is_technical: None,
            city: None,
            country: None,
            priority_areas: Vec::new(),
            has_startup: None,
            is_active: true,
        }
    }
}

fn default_true() -> bool { true }

fn lenient_yes_no<'de, D>(deserializer: D) -> Result<Option<YesNo>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(YesNo::parse))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(tags.unwrap_or_default())
}

/// Swipe decision on a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Skip,
}

impl SwipeAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "like" => Some(SwipeAction::Like),
            "skip" => Some(SwipeAction::Skip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Skip => "skip",
        }
    }
}

/// A like or skip of one user by another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    pub user_id: String,
    pub target_user_id: String,
    pub action: SwipeAction,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Ranked candidate returned to the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(rename = "linkedinUrl")]
    pub linkedin_url: Option<String>,
    #[serde(rename = "isTechnical")]
    pub is_technical: Option<YesNo>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "priorityAreas")]
    pub priority_areas: Vec<String>,
    #[serde(rename = "hasStartup")]
    pub has_startup: Option<YesNo>,
    #[serde(rename = "matchScore")]
    pub match_score: u32,
    #[serde(rename = "sharedPriorityAreas")]
    pub shared_priority_areas: Vec<String>,
}

impl ScoredCandidate {
    pub fn from_profile(profile: FounderProfile, match_score: u32, shared_priority_areas: Vec<String>) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            linkedin_url: profile.linkedin_url,
            is_technical: profile.is_technical,
            city: profile.city,
            country: profile.country,
            priority_areas: profile.priority_areas,
            has_startup: profile.has_startup,
            match_score,
            shared_priority_areas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_parses_camel_case_row() {
        let profile: FounderProfile = serde_json::from_value(json!({
            "userId": "u1",
            "isTechnical": "Yes",
            "city": "Austin",
            "priorityAreas": ["AI", "Climate"],
            "hasStartup": "no"
        }))
        .unwrap();

        assert_eq!(profile.is_technical, Some(YesNo::Yes));
        assert_eq!(profile.has_startup, Some(YesNo::No));
        assert_eq!(profile.priority_areas, vec!["AI", "Climate"]);
        assert!(profile.is_active);
    }

    #[test]
    fn test_profile_parses_snake_case_row_with_nulls() {
        let profile: FounderProfile = serde_json::from_value(json!({
            "user_id": "u2",
            "is_technical": null,
            "priority_areas": null,
            "has_startup": "maybe",
            "is_active": false
        }))
        .unwrap();

        assert_eq!(profile.user_id, "u2");
        assert_eq!(profile.is_technical, None);
        assert_eq!(profile.has_startup, None);
        assert!(profile.priority_areas.is_empty());
        assert!(!profile.is_active);
    }

    #[test]
    fn test_swipe_action_parse() {
        assert_eq!(SwipeAction::parse("LIKE"), Some(SwipeAction::Like));
        assert_eq!(SwipeAction::parse("skip"), Some(SwipeAction::Skip));
        assert_eq!(SwipeAction::parse("superlike"), None);
    }
}
