//! Retention sweeper for the code store
//!
//! Periodically deletes code rows older than the code TTL. Redemption never
//! depends on the sweeper: expired rows are already excluded by
//! `find_valid`, so a stopped or failing sweeper only lets the table grow.

mod service;

#[cfg(test)]
mod tests;

pub use service::{RetentionSweeper, RetentionSweeperConfig, SweepResult, SweeperHandle, SweeperReport};
