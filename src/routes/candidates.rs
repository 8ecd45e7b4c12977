use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::ProfileScorer;
use crate::models::{
    ErrorResponse, FindCandidatesRequest, FindCandidatesResponse, FounderProfile, HealthResponse,
    MatchesResponse, RecordSwipeRequest, RecordSwipeResponse, Swipe, SwipeAction,
};
use crate::services::{AuthenticatedUser, CacheKey, CacheManager, PostgresClient, StoreClient, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub scorer: ProfileScorer,
    pub matching: MatchingSettings,
}

/// Configure candidate, swipe and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/candidates", web::post().to(find_candidates))
        .route("/swipes", web::post().to(record_swipe))
        .route("/swipes", web::get().to(get_swiped_profiles))
        .route("/swipes/stats", web::get().to(get_swipe_stats))
        .route("/swipes", web::delete().to(reset_swipes))
        .route("/swipes/{target_user_id}", web::delete().to(undo_swipe))
        .route("/matches", web::get().to(get_matches))
        .route("/profile/refresh", web::post().to(refresh_profile));
}

fn error_json(status: actix_web::http::StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

fn internal_error(error: &str, message: impl ToString) -> HttpResponse {
    error_json(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, error, message)
}

fn bad_request(error: &str, message: impl ToString) -> HttpResponse {
    error_json(actix_web::http::StatusCode::BAD_REQUEST, error, message)
}

/// Requested page size, defaulted and capped by the matching settings
pub fn resolve_limit(requested: Option<u16>, settings: &MatchingSettings) -> usize {
    requested
        .unwrap_or(settings.default_limit)
        .min(settings.max_limit) as usize
}

/// IDs pushed into the store's `not.in` filter
///
/// Client-provided IDs come first, then swipes newest first, deduplicated
/// and cut at `cap`. The full exclusion set is still applied after ranking.
pub fn store_exclusions(client_ids: &[String], swiped: &[String], cap: usize) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids = Vec::new();

    for id in client_ids.iter().chain(swiped) {
        if ids.len() == cap {
            break;
        }
        if seen.insert(id.as_str()) {
            ids.push(id.clone());
        }
    }

    ids
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache_entries: state.cache.stats().l1_size,
    })
}

/// Load a profile through the cache
async fn load_profile(state: &AppState, user_id: &str) -> Result<FounderProfile, StoreError> {
    let key = CacheKey::profile(user_id);

    if let Some(profile) = state.cache.get_optional::<FounderProfile>(&key).await {
        return Ok(profile);
    }

    let profile = state.store.get_profile(user_id).await?;

    if let Err(e) = state.cache.set(&key, &profile).await {
        tracing::warn!("Failed to cache profile for {}: {}", user_id, e);
    }

    Ok(profile)
}

/// Ranked candidates for the signed-in user
///
/// POST /api/v1/candidates
///
/// Request body:
/// ```json
/// {
///   "limit": 20,
///   "excludeUserIds": ["string"]
/// }
/// ```
async fn find_candidates(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<FindCandidatesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_candidates request: {:?}", errors);
        return bad_request("Validation failed", errors);
    }

    let user_id = &user.user_id;
    let limit = resolve_limit(req.limit, &state.matching);

    tracing::info!("Finding candidates for user: {}, limit: {}", user_id, limit);

    let swiped = match state.postgres.get_swiped_ids(user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Failed to fetch swipes for {}, proceeding without filtering: {}", user_id, e);
            vec![]
        }
    };

    let exclude_ids = store_exclusions(&req.exclude_user_ids, &swiped, state.matching.max_store_exclusions);

    let excluded: HashSet<String> = swiped
        .into_iter()
        .chain(req.exclude_user_ids.iter().cloned())
        .collect();

    tracing::debug!("Excluding {} profiles for user {}", excluded.len(), user_id);

    let viewer = match load_profile(&state, user_id).await {
        Ok(profile) => profile,
        Err(StoreError::NotFound(message)) => {
            return error_json(actix_web::http::StatusCode::NOT_FOUND, "Profile not found", message);
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return internal_error("Failed to fetch user profile", e);
        }
    };

    let pool_size = limit * state.matching.candidate_pool_factor.max(1) as usize;

    let candidates = match state.store.query_candidates(user_id, &exclude_ids, pool_size).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to query candidates for {}: {}", user_id, e);
            return internal_error("Failed to query candidates", e);
        }
    };

    let result = state.scorer.find_matches(&viewer, candidates, &excluded, limit);

    tracing::info!(
        "Returning {} candidates for user {} (from {} loaded)",
        result.matches.len(),
        user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindCandidatesResponse {
        candidates: result.matches,
        total_results: result.total_candidates,
    })
}

/// Record a like or skip
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "targetUserId": "string",
///   "action": "like|skip"
/// }
/// ```
async fn record_swipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<RecordSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors);
    }

    let action = match SwipeAction::parse(&req.action) {
        Some(action) => action,
        None => return bad_request("Invalid action", "Action must be one of: like, skip"),
    };

    if req.target_user_id == user.user_id {
        return bad_request("Invalid target", "Cannot swipe on your own profile");
    }

    if let Err(e) = state.postgres.record_swipe(&user.user_id, &req.target_user_id, action).await {
        tracing::error!("Failed to record swipe in PostgreSQL: {}", e);
        return internal_error("Failed to record swipe", e);
    }

    let swipe = Swipe {
        user_id: user.user_id.clone(),
        target_user_id: req.target_user_id.clone(),
        action,
        created_at: chrono::Utc::now(),
    };

    if let Err(e) = state.store.record_swipe(&swipe).await {
        tracing::warn!("Swipe recorded in PostgreSQL but store mirror failed: {}", e);
    }

    let is_match = match action {
        SwipeAction::Like => state
            .postgres
            .has_liked(&req.target_user_id, &user.user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to check mutual like for {}: {}", user.user_id, e);
                false
            }),
        SwipeAction::Skip => false,
    };

    if is_match {
        tracing::info!("New match: {} <-> {}", user.user_id, req.target_user_id);
    }

    HttpResponse::Ok().json(RecordSwipeResponse {
        success: true,
        is_match,
    })
}

/// Profile IDs the signed-in user already liked or skipped
///
/// GET /api/v1/swipes
async fn get_swiped_profiles(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.postgres.get_swiped_ids(&user.user_id).await {
        Ok(ids) => HttpResponse::Ok().json(serde_json::json!({
            "userId": user.user_id,
            "swipedProfiles": ids,
            "count": ids.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch swipes for {}: {}", user.user_id, e);
            internal_error("Failed to fetch swipes", e)
        }
    }
}

/// GET /api/v1/swipes/stats
async fn get_swipe_stats(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.postgres.get_swipe_stats(&user.user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            tracing::error!("Failed to fetch swipe stats for {}: {}", user.user_id, e);
            internal_error("Failed to fetch swipe stats", e)
        }
    }
}

/// Undo a swipe so the profile can be ranked again
///
/// DELETE /api/v1/swipes/{targetUserId}
async fn undo_swipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder {
    let target_user_id = path.into_inner();

    let removed = match state.postgres.remove_swipe(&user.user_id, &target_user_id).await {
        Ok(removed) => removed,
        Err(e) => {
            tracing::error!("Failed to remove swipe {} -> {}: {}", user.user_id, target_user_id, e);
            return internal_error("Failed to remove swipe", e);
        }
    };

    if let Err(e) = state.store.remove_swipe(&user.user_id, &target_user_id).await {
        tracing::warn!("Swipe removed from PostgreSQL but store mirror failed: {}", e);
    }

    HttpResponse::Ok().json(serde_json::json!({ "removed": removed }))
}

/// Forget every swipe so all profiles can be ranked again
///
/// DELETE /api/v1/swipes
async fn reset_swipes(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    let cleared = match state.postgres.clear_swipes(&user.user_id).await {
        Ok(cleared) => cleared,
        Err(e) => {
            tracing::error!("Failed to clear swipes for {}: {}", user.user_id, e);
            return internal_error("Failed to clear swipes", e);
        }
    };

    if let Err(e) = state.store.clear_swipes(&user.user_id).await {
        tracing::warn!("Swipes cleared in PostgreSQL but store mirror failed: {}", e);
    }

    tracing::info!("Cleared {} swipes for user {}", cleared, user.user_id);

    HttpResponse::Ok().json(serde_json::json!({ "cleared": cleared }))
}

/// Drop the cached copy of the caller's profile after an edit
///
/// POST /api/v1/profile/refresh
async fn refresh_profile(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.cache.delete(&CacheKey::profile(&user.user_id)).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "refreshed": true })),
        Err(e) => {
            tracing::error!("Failed to invalidate cached profile for {}: {}", user.user_id, e);
            internal_error("Failed to refresh profile", e)
        }
    }
}

/// Mutual matches, newest first
///
/// GET /api/v1/matches
async fn get_matches(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    let ids = match state.postgres.get_mutual_matches(&user.user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to fetch matches for {}: {}", user.user_id, e);
            return internal_error("Failed to fetch matches", e);
        }
    };

    let profiles = match state.store.get_profiles(&ids).await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Failed to fetch match profiles for {}: {}", user.user_id, e);
            return internal_error("Failed to fetch match profiles", e);
        }
    };

    let matches = order_by_ids(profiles, &ids);

    HttpResponse::Ok().json(MatchesResponse {
        count: matches.len(),
        matches,
    })
}

/// Reorder store rows to follow `ids`; rows not listed are dropped
fn order_by_ids(profiles: Vec<FounderProfile>, ids: &[String]) -> Vec<FounderProfile> {
    let mut by_id: std::collections::HashMap<String, FounderProfile> = profiles
        .into_iter()
        .map(|p| (p.user_id.clone(), p))
        .collect();

    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        let settings = MatchingSettings::default();

        assert_eq!(resolve_limit(None, &settings), 20);
        assert_eq!(resolve_limit(Some(5), &settings), 5);
        assert_eq!(resolve_limit(Some(500), &settings), 100);
    }

    #[test]
    fn test_store_exclusions_bounded() {
        let client = vec!["c1".to_string(), "s2".to_string()];
        let swiped: Vec<String> = (1..=300).map(|i| format!("s{}", i)).collect();

        let ids = store_exclusions(&client, &swiped, 4);
        assert_eq!(ids, vec!["c1", "s2", "s1", "s3"]);

        let all = store_exclusions(&client, &swiped, 1000);
        assert_eq!(all.len(), 301);
    }

    #[test]
    fn test_order_by_ids() {
        let profiles = vec![
            FounderProfile::new("a"),
            FounderProfile::new("b"),
            FounderProfile::new("stray"),
        ];
        let ids = vec!["b".to_string(), "missing".to_string(), "a".to_string()];

        let ordered: Vec<String> = order_by_ids(profiles, &ids)
            .into_iter()
            .map(|p| p.user_id)
            .collect();

        assert_eq!(ordered, vec!["b", "a"]);
    }
}
