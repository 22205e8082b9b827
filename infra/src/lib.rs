//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository traits and the
//! notification sink used by the verification server.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL code store and user registry using SQLx, plus the
//!   connection pool and bundled schema migrations
//! - **Notification**: sinks consuming issued-code events
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use vc_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Notification sinks for issued-code events
pub mod notification;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Load a `.env` file if one exists, for binaries and ignored integration tests
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }
}
