use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::SwipeAction;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Swipe action as stored in the `swipe_action` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swipe_action", rename_all = "lowercase")]
pub enum SwipeKind {
    Like,
    Skip,
}

impl From<SwipeAction> for SwipeKind {
    fn from(value: SwipeAction) -> Self {
        match value {
            SwipeAction::Like => SwipeKind::Like,
            SwipeAction::Skip => SwipeKind::Skip,
        }
    }
}

/// PostgreSQL client for likes and skips
///
/// This is the source of truth for which profiles a user has already swiped
/// on and for mutual-match detection. The hosted store only gets a
/// best-effort copy.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Build a pool that connects on first use, without running migrations
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Record a like or skip
    ///
    /// A later swipe on the same pair replaces the earlier action.
    pub async fn record_swipe(
        &self,
        user_id: &str,
        target_user_id: &str,
        action: SwipeAction,
    ) -> Result<(), PostgresError> {
        if user_id == target_user_id {
            return Err(PostgresError::InvalidInput("cannot swipe on own profile".to_string()));
        }

        let query = r#"
            INSERT INTO swipes (user_id, target_user_id, action, swiped_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, target_user_id)
            DO UPDATE SET
                action = EXCLUDED.action,
                swiped_at = EXCLUDED.swiped_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .bind(SwipeKind::from(action))
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded swipe: {} -> {} ({})",
            user_id,
            target_user_id,
            action.as_str()
        );

        Ok(())
    }

    /// Get all user IDs the given user has liked or skipped, most recent first
    pub async fn get_swiped_ids(&self, user_id: &str) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT target_user_id
            FROM swipes
            WHERE user_id = $1
            ORDER BY swiped_at DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let ids: Vec<String> = rows
            .iter()
            .map(|row| row.get("target_user_id"))
            .collect();

        tracing::debug!("User {} has swiped on {} profiles", user_id, ids.len());

        Ok(ids)
    }

    /// Whether `user_id` has liked `target_user_id`
    pub async fn has_liked(&self, user_id: &str, target_user_id: &str) -> Result<bool, PostgresError> {
        let query = r#"
            SELECT EXISTS (
                SELECT 1 FROM swipes
                WHERE user_id = $1 AND target_user_id = $2 AND action = 'like'
            ) AS liked
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("liked"))
    }

    /// User IDs that the user liked and that liked the user back, newest first
    pub async fn get_mutual_matches(&self, user_id: &str) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT mine.target_user_id
            FROM swipes mine
            JOIN swipes theirs
              ON theirs.user_id = mine.target_user_id
             AND theirs.target_user_id = mine.user_id
            WHERE mine.user_id = $1
              AND mine.action = 'like'
              AND theirs.action = 'like'
            ORDER BY GREATEST(mine.swiped_at, theirs.swiped_at) DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("target_user_id")).collect())
    }

    /// Remove a swipe record (undo)
    pub async fn remove_swipe(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM swipes
            WHERE user_id = $1 AND target_user_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear all swipes for a user
    pub async fn clear_swipes(&self, user_id: &str) -> Result<u64, PostgresError> {
        let query = r#"
            DELETE FROM swipes
            WHERE user_id = $1
        "#;

        let result = sqlx::query(query).bind(user_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} swipes for user {}",
            result.rows_affected(),
            user_id
        );

        Ok(result.rows_affected())
    }

    /// Get statistics about a user's swipes
    pub async fn get_swipe_stats(&self, user_id: &str) -> Result<SwipeStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE action = 'like') as liked,
                COUNT(*) FILTER (WHERE action = 'skip') as skipped,
                MAX(swiped_at) as last_swiped_at
            FROM swipes
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query).bind(user_id).fetch_one(&self.pool).await?;

        Ok(SwipeStats {
            user_id: user_id.to_string(),
            total: row.get("total"),
            liked: row.get("liked"),
            skipped: row.get("skipped"),
            last_swiped_at: row.get("last_swiped_at"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Statistics about a user's swipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeStats {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub total: i64,
    pub liked: i64,
    pub skipped: i64,
    #[serde(rename = "lastSwipedAt")]
    pub last_swiped_at: Option<chrono::DateTime<chrono::Utc>>,
}
