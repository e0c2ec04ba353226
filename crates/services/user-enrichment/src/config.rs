//! User enrichment service configuration.

use std::env;
use std::time::Duration;

use common::{DatabaseConfig, ServiceConfig};

/// Default age provider endpoint
pub const DEFAULT_AGE_API_URL: &str = "https://api.agify.io/";

/// Default gender provider endpoint
pub const DEFAULT_GENDER_API_URL: &str = "https://api.genderize.io/";

/// Default nationality provider endpoint
pub const DEFAULT_NATIONALITY_API_URL: &str = "https://api.nationalize.io/";

/// Default time in-flight requests get to finish after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 10;

/// Base URLs of the three attribute providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            age_url: DEFAULT_AGE_API_URL.to_string(),
            gender_url: DEFAULT_GENDER_API_URL.to_string(),
            nationality_url: DEFAULT_NATIONALITY_API_URL.to_string(),
        }
    }
}

/// User enrichment service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub providers: ProviderConfig,
    /// Seconds in-flight requests may run after a shutdown signal
    pub shutdown_grace_seconds: u64,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.parse::<u64>().ok());

        Self {
            service: ServiceConfig {
                service_name: "user-enrichment".to_string(),
                host: lookup("USER_SERVICE_HOST").unwrap_or(defaults.service.host),
                port: lookup("USER_SERVICE_PORT")
                    .or_else(|| lookup("PORT"))
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.service.port),
                log_level: lookup("LOG_LEVEL").unwrap_or(defaults.service.log_level),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .or_else(|| compose_database_url(&lookup))
                    .unwrap_or(defaults.database.url),
                connect_attempts: lookup("DB_CONNECT_ATTEMPTS")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(defaults.database.connect_attempts),
                connect_retry_ms: parsed("DB_CONNECT_RETRY_MS")
                    .unwrap_or(defaults.database.connect_retry_ms),
            },
            providers: ProviderConfig {
                age_url: lookup("AGE_API_URL").unwrap_or(defaults.providers.age_url),
                gender_url: lookup("GENDER_API_URL").unwrap_or(defaults.providers.gender_url),
                nationality_url: lookup("NATIONALITY_API_URL")
                    .unwrap_or(defaults.providers.nationality_url),
            },
            shutdown_grace_seconds: parsed("SHUTDOWN_GRACE_SECONDS")
                .unwrap_or(defaults.shutdown_grace_seconds),
        }
    }

    /// Time in-flight requests may run after a shutdown signal.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

/// Build a Postgres URL from the individual `DB_*` variables.
///
/// Only used when `DB_HOST` is present.
fn compose_database_url(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let host = lookup("DB_HOST")?;
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());
    let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let name = lookup("DB_NAME").unwrap_or_else(|| "users".to_string());
    let ssl_mode = lookup("DB_SSLMODE").unwrap_or_else(|| "disable".to_string());

    Some(format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        user, password, host, port, name, ssl_mode
    ))
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "user-enrichment".to_string(),
                ..ServiceConfig::default()
            },
            database: DatabaseConfig::default(),
            providers: ProviderConfig::default(),
            shutdown_grace_seconds: DEFAULT_SHUTDOWN_GRACE_SECONDS,
        }
    }
}
