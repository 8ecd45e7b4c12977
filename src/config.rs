use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub store: StoreSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default)]
    pub tables: TableSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_profiles_table")]
    pub profiles: String,
    #[serde(default = "default_likes_table")]
    pub likes: String,
    #[serde(default = "default_skips_table")]
    pub skips: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles_table(),
            likes: default_likes_table(),
            skips: default_skips_table(),
        }
    }
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_likes_table() -> String { "likes".to_string() }
fn default_skips_table() -> String { "skips".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    /// How many store rows to fetch per requested candidate
    #[serde(default = "default_pool_factor")]
    pub candidate_pool_factor: u16,
    /// Most recent swipes sent to the store as a `not.in` filter; older ones
    /// are only filtered after the rows come back
    #[serde(default = "default_max_store_exclusions")]
    pub max_store_exclusions: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            candidate_pool_factor: default_pool_factor(),
            max_store_exclusions: default_max_store_exclusions(),
        }
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }
fn default_pool_factor() -> u16 { 5 }
fn default_max_store_exclusions() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FOUNDER__)
    /// 5. Unprefixed DATABASE_URL, JWT_SECRET, STORE_URL, STORE_API_KEY and REDIS_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FOUNDER__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_env_overrides(settings, |name| std::env::var(name).ok())?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("FOUNDER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the unprefixed variables that hosting platforms usually inject
fn apply_env_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const OVERRIDES: &[(&str, &str)] = &[
        ("DATABASE_URL", "database.url"),
        ("JWT_SECRET", "auth.jwt_secret"),
        ("STORE_URL", "store.url"),
        ("STORE_API_KEY", "store.api_key"),
        ("REDIS_URL", "cache.redis_url"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in OVERRIDES {
        if let Some(value) = lookup(var) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [auth]
        jwt_secret = "secret"

        [store]
        url = "https://store.test"
        api_key = "key"

        [database]
        url = "postgres://localhost/founder_match"

        [cache]
        redis_url = "redis://127.0.0.1:6379"
    "#;

    fn minimal_config() -> Config {
        Config::builder()
            .add_source(File::from_str(MINIMAL, FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let settings: Settings = minimal_config().try_deserialize().unwrap();

        assert_eq!(settings.matching.default_limit, 20);
        assert_eq!(settings.matching.max_limit, 100);
        assert_eq!(settings.matching.candidate_pool_factor, 5);
        assert_eq!(settings.matching.max_store_exclusions, 100);
        assert_eq!(settings.store.tables.profiles, "profiles");
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_env_overrides() {
        let lookup = |name: &str| match name {
            "DATABASE_URL" => Some("postgres://db.internal/founders".to_string()),
            "JWT_SECRET" => Some("rotated".to_string()),
            _ => None,
        };

        let settings: Settings = apply_env_overrides(minimal_config(), lookup)
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.url, "postgres://db.internal/founders");
        assert_eq!(settings.auth.jwt_secret, "rotated");
        assert_eq!(settings.store.url, "https://store.test");
    }
}
