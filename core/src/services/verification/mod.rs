//! Verification service module for phone-based registration codes
//!
//! This module provides the complete code lifecycle:
//! - Code generation (six digits, never below 100000)
//! - Issuance into the code store
//! - Single-use redemption guarded by a conditional store write
//! - User activation on successful redemption
//! - Notification hand-off for issued codes

mod config;
mod generator;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use generator::{CodeGenerator, RandomCodeGenerator};
pub use service::VerificationService;
pub use types::{ActivationStatus, IssueOutcome, RedeemOutcome, VerificationStats};
