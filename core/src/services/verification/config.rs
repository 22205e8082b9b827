//! Configuration for the verification service

use std::time::Duration;

use vc_shared::config::VerificationConfig;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Deadline applied to every individual store call
    pub store_timeout: Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }
}
