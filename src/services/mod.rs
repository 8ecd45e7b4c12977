// Service exports
pub mod auth;
pub mod cache;
pub mod postgres;
pub mod store;

pub use auth::{AuthError, AuthenticatedUser, Claims, SessionVerifier};
pub use cache::{CacheManager, CacheKey, CacheError, CacheStats};
pub use postgres::{PostgresClient, PostgresError, SwipeStats};
pub use store::{StoreClient, StoreTables, StoreError};
