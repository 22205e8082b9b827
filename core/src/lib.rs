//! # Verification Core
//!
//! Core business logic for phone verification codes.
//! This crate contains domain entities, the verification engine, the retention
//! sweeper, repository interfaces and error types. Storage backends live in
//! the infrastructure crate; the in-memory repositories here back tests and
//! development runs.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
