use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for a ranked candidate list
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FindCandidatesRequest {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[validate(length(max = 200))]
    #[serde(default)]
    #[serde(alias = "exclude_user_ids", rename = "excludeUserIds")]
    pub exclude_user_ids: Vec<String>,
}

/// Request to record a like or skip
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordSwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    pub action: String,
}
