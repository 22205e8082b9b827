//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration
//! - `verification` - Code store timeouts, sweeper and admin settings

pub mod database;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use verification::{AdminConfig, StoreBackend, SweeperConfig, VerificationConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Persistence backend selection
    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Verification engine configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Retention sweeper configuration
    #[serde(default)]
    pub sweeper: SweeperConfig,

    /// Admin configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            store_backend: StoreBackend::default(),
            database: DatabaseConfig::default(),
            verification: VerificationConfig::default(),
            sweeper: SweeperConfig::default(),
            admin: AdminConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// The environment specific `.env.<environment>` file is read first, then
    /// a plain `.env`; variables already present in the process win.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        Self {
            environment,
            server: ServerConfig::from_env(),
            store_backend: env_or("STORE_BACKEND", StoreBackend::default()),
            database: DatabaseConfig::from_env(),
            verification: VerificationConfig::from_env(),
            sweeper: SweeperConfig::from_env(),
            admin: AdminConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is missing or malformed.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_missing_and_malformed() {
        assert_eq!(env_or("VC_SHARED_TEST_UNSET_VARIABLE", 42u64), 42);

        std::env::set_var("VC_SHARED_TEST_MALFORMED", "not-a-number");
        assert_eq!(env_or("VC_SHARED_TEST_MALFORMED", 7u32), 7);

        std::env::set_var("VC_SHARED_TEST_PRESENT", " 15 ");
        assert_eq!(env_or("VC_SHARED_TEST_PRESENT", 7u32), 15);
    }

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.store_backend, StoreBackend::Mysql);
        assert_eq!(config.sweeper.interval_seconds, 60);
        assert!(config.admin.secret.is_none());
    }
}
