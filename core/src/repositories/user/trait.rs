//! User registry trait defining the interface for user persistence.
//!
//! The registry is the only writer of a user's status. Rows are keyed by the
//! normalized phone number and are never deleted here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::user::{User, UserStatus};
use crate::errors::DomainError;

/// Repository trait for User persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an active user or flip an existing one to active
    ///
    /// Idempotent: activating an already-active user succeeds and leaves it
    /// active.
    ///
    /// # Arguments
    /// * `phone` - Normalized phone number
    /// * `at` - Timestamp recorded as creation and/or update time
    async fn activate(&self, phone: &str, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Record a pending user if the phone is unknown
    ///
    /// Never downgrades an active user back to pending.
    async fn register_pending(&self, phone: &str, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Find a user by phone
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - Phone unknown
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Count users with the given status
    async fn count_by_status(&self, status: UserStatus) -> Result<u64, DomainError>;
}
