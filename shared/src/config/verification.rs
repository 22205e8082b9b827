//! Verification, retention sweeper and admin configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Persistence backend used for codes and users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MySQL through the connection pool
    #[default]
    Mysql,
    /// Process-local maps; state is lost on restart
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::Mysql),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

/// Verification engine settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Upper bound for a single store call, in milliseconds
    pub store_timeout_ms: u64,

    /// Capacity of the issued-code notification queue
    pub notification_buffer: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            notification_buffer: 256,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", defaults.store_timeout_ms),
            notification_buffer: env_or("NOTIFICATION_BUFFER", defaults.notification_buffer),
        }
    }
}

/// Retention sweeper settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweeperConfig {
    /// Whether the background purge runs at all
    pub enabled: bool,

    /// Seconds between purge cycles
    pub interval_seconds: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl SweeperConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("SWEEPER_ENABLED", defaults.enabled),
            interval_seconds: env_or("SWEEPER_INTERVAL_SECONDS", defaults.interval_seconds),
        }
    }
}

/// Admin endpoints and notification recipients
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Shared secret for the admin endpoints; `None` disables them
    pub secret: Option<String>,

    /// Messaging-channel ids that receive "new registration" notifications
    pub admin_ids: Vec<String>,
}

impl AdminConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("ADMIN_SECRET").ok().filter(|s| !s.is_empty());
        let admin_ids = std::env::var("ADMIN_IDS")
            .map(|ids| parse_admin_ids(&ids))
            .unwrap_or_default();

        Self { secret, admin_ids }
    }

    /// Check a presented key against the configured secret
    pub fn is_authorized(&self, key: &str) -> bool {
        matches!(&self.secret, Some(secret) if secret == key)
    }
}

fn parse_admin_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}
