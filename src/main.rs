use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use founder_match::config::Settings;
use founder_match::core::ProfileScorer;
use founder_match::routes::{self, candidates::AppState, handle_json_payload_error, handle_query_payload_error};
use founder_match::services::{CacheManager, PostgresClient, SessionVerifier, StoreClient, StoreTables};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(what: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", what, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Founder Match service...");
    info!("Configuration loaded successfully");

    let store = Arc::new(
        StoreClient::new(
            settings.store.url.clone(),
            settings.store.api_key.clone(),
            StoreTables {
                profiles: settings.store.tables.profiles.clone(),
                likes: settings.store.tables.likes.clone(),
                skips: settings.store.tables.skips.clone(),
            },
        )
        .map_err(|e| startup_error("Failed to build store client", e))?,
    );

    info!("Store client initialized");

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = Arc::new(
        CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl)
            .await
            .map_err(|e| startup_error("Failed to connect to Redis", e))?,
    );

    info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let verifier = web::Data::new(SessionVerifier::new(
        &settings.auth.jwt_secret,
        settings.auth.audience.as_deref(),
    ));

    let app_state = AppState {
        store,
        cache,
        postgres,
        scorer: ProfileScorer::new(),
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
