use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for profile lookups
///
/// L1 is an in-process moka cache, L2 is Redis shared across instances.
/// Both tiers expire entries after the configured TTL. Without Redis only
/// L1 is used.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            ..Self::in_memory(l1_size, ttl_secs)
        })
    }

    /// L1-only cache, for single-instance runs and tests
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis: None,
            l1_cache,
            ttl_secs,
        }
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let value: Option<String> = match &self.redis {
            Some(l2) => {
                let mut conn = l2.lock().await;
                redis::cmd("GET").arg(key).query_async(&mut *conn).await?
            }
            None => None,
        };

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                let parsed = serde_json::from_str(&json)?;
                self.l1_cache.insert(key.to_string(), json.into_bytes()).await;
                Ok(parsed)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Like [`CacheManager::get`], but misses and cache failures become `None`
    ///
    /// Failures are logged; callers fall back to the source of truth.
    pub async fn get_optional<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.get(key).await {
            Ok(value) => Some(value),
            Err(CacheError::CacheMiss(_)) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Set a value in both tiers
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a user's profile row
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}
