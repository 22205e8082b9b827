//! Route handlers
//!
//! - `health` - liveness probe
//! - `verification` - issue and redeem codes
//! - `admin` - assisted redemption and registration statistics

pub mod admin;
pub mod health;
pub mod verification;
