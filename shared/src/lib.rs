//! Shared utilities and common types for the verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Phone number helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AdminConfig, AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    ServerConfig, StoreBackend, SweeperConfig, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
