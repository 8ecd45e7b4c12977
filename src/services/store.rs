use crate::models::{FounderProfile, Swipe, SwipeAction};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the hosted store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the hosted store
#[derive(Debug, Clone)]
pub struct StoreTables {
    pub profiles: String,
    pub likes: String,
    pub skips: String,
}

/// REST client for the hosted relational store
///
/// Handles all communication with the row API including:
/// - Fetching the viewer's profile
/// - Querying candidate profiles
/// - Mirroring likes and skips
pub struct StoreClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: StoreTables,
}

impl StoreClient {
    /// Create a new store client
    pub fn new(base_url: String, api_key: String, tables: StoreTables) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn get_rows(&self, url: &str) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let json: Value = check_status(response).await?.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(StoreError::InvalidResponse("Expected an array of rows".into())),
        }
    }

    /// Get a single profile by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<FounderProfile, StoreError> {
        let url = format!(
            "{}?select=*&user_id=eq.{}&limit=1",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let rows = self.get_rows(&url).await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", user_id)))?;

        serde_json::from_value(row)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    /// Get the profiles for a set of user IDs, skipping rows that fail to parse
    pub async fn get_profiles(&self, user_ids: &[String]) -> Result<Vec<FounderProfile>, StoreError> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let url = format!(
            "{}?select=*&user_id=in.{}",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(&in_list(user_ids))
        );

        let rows = self.get_rows(&url).await?;

        Ok(parse_profiles(rows))
    }

    /// Query active candidate profiles other than the viewer's
    pub async fn query_candidates(
        &self,
        viewer_id: &str,
        exclude_ids: &[String],
        limit: usize,
    ) -> Result<Vec<FounderProfile>, StoreError> {
        let mut url = format!(
            "{}?select=*&is_active=eq.true&user_id=neq.{}&limit={}",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(viewer_id),
            limit
        );

        if !exclude_ids.is_empty() {
            url.push_str("&user_id=not.in.");
            url.push_str(&urlencoding::encode(&in_list(exclude_ids)));
        }

        let rows = self.get_rows(&url).await?;
        let total = rows.len();

        let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
        let profiles: Vec<FounderProfile> = parse_profiles(rows)
            .into_iter()
            .filter(|p| p.user_id != viewer_id && !excluded.contains(p.user_id.as_str()))
            .collect();

        tracing::debug!("Queried {} candidates ({} rows)", profiles.len(), total);

        Ok(profiles)
    }

    fn swipe_table(&self, action: SwipeAction) -> &str {
        match action {
            SwipeAction::Like => &self.tables.likes,
            SwipeAction::Skip => &self.tables.skips,
        }
    }

    /// Delete rows matching `filter` from `table`
    async fn delete_rows(&self, table: &str, filter: &str) -> Result<(), StoreError> {
        let url = format!("{}?{}", self.table_url(table), filter);

        let response = self
            .client
            .delete(&url)
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Mirror a like or skip into the store
    ///
    /// A pair lives in at most one of the likes and skips tables, so the row
    /// is removed from the other table before the upsert.
    pub async fn record_swipe(&self, swipe: &Swipe) -> Result<(), StoreError> {
        let opposite = match swipe.action {
            SwipeAction::Like => SwipeAction::Skip,
            SwipeAction::Skip => SwipeAction::Like,
        };

        self.delete_rows(
            self.swipe_table(opposite),
            &pair_filter(&swipe.user_id, &swipe.target_user_id),
        )
        .await?;

        let payload = json!({
            "user_id": swipe.user_id,
            "target_user_id": swipe.target_user_id,
            "created_at": swipe.created_at,
        });

        let response = self
            .client
            .post(self.table_url(self.swipe_table(swipe.action)))
            .header("apikey", &self.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        check_status(response).await?;

        tracing::debug!("Recorded {} in store: {} -> {}", swipe.action.as_str(), swipe.user_id, swipe.target_user_id);

        Ok(())
    }

    /// Remove a mirrored swipe from both tables
    pub async fn remove_swipe(&self, user_id: &str, target_user_id: &str) -> Result<(), StoreError> {
        let filter = pair_filter(user_id, target_user_id);

        self.delete_rows(&self.tables.likes, &filter).await?;
        self.delete_rows(&self.tables.skips, &filter).await?;

        tracing::debug!("Removed store swipe: {} -> {}", user_id, target_user_id);
        Ok(())
    }

    /// Remove every mirrored swipe made by a user
    pub async fn clear_swipes(&self, user_id: &str) -> Result<(), StoreError> {
        let filter = format!("user_id=eq.{}", urlencoding::encode(user_id));

        self.delete_rows(&self.tables.likes, &filter).await?;
        self.delete_rows(&self.tables.skips, &filter).await?;

        tracing::debug!("Cleared store swipes for {}", user_id);
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
    tracing::error!("Store request failed: {} - {}", status, body);
    Err(StoreError::ApiError(format!("{}: {}", status, body)))
}

fn parse_profiles(rows: Vec<Value>) -> Vec<FounderProfile> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Skipping unparseable profile row: {}", e);
                None
            }
        })
        .collect()
}

fn pair_filter(user_id: &str, target_user_id: &str) -> String {
    format!(
        "user_id=eq.{}&target_user_id=eq.{}",
        urlencoding::encode(user_id),
        urlencoding::encode(target_user_id)
    )
}

/// Quoted `in` filter value, e.g. `("a","b")`
fn in_list(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("({})", quoted.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tables() -> StoreTables {
        StoreTables {
            profiles: "profiles".to_string(),
            likes: "likes".to_string(),
            skips: "skips".to_string(),
        }
    }

    #[test]
    fn test_store_client_creation() {
        let client = StoreClient::new(
            "https://store.test/".to_string(),
            "test_key".to_string(),
            test_tables(),
        )
        .unwrap();

        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.table_url("profiles"), "https://store.test/rest/v1/profiles");
    }

    #[test]
    fn test_in_list_quotes_ids() {
        let ids = vec!["a".to_string(), "b\"c".to_string()];
        assert_eq!(in_list(&ids), r#"("a","b\"c")"#);
    }

    #[test]
    fn test_pair_filter_encodes_ids() {
        assert_eq!(
            pair_filter("u 1", "u&2"),
            "user_id=eq.u%201&target_user_id=eq.u%262"
        );
    }
}
