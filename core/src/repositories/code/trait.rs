//! Code store trait defining the interface for verification code persistence.
//!
//! The store owns every code row. Implementations must make `mark_used` a
//! single conditional write so that concurrent redemptions of one row cannot
//! both observe the `used: false -> true` transition.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::verification_code::{CodeId, VerificationCode};
use crate::errors::DomainError;

/// Repository trait for verification code rows
///
/// All time predicates take `now` explicitly; implementations must not read
/// the clock themselves.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use chrono::{DateTime, Duration, Utc};
/// use vc_core::domain::entities::verification_code::{CodeId, VerificationCode};
/// use vc_core::errors::DomainError;
/// use vc_core::repositories::CodeRepository;
///
/// struct PostgresCodeRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl CodeRepository for PostgresCodeRepository {
///     async fn insert(
///         &self,
///         phone: &str,
///         code: &str,
///         created_at: DateTime<Utc>,
///     ) -> Result<CodeId, DomainError> {
///         // INSERT INTO verification_codes ...
///         Ok(CodeId(1))
///     }
///
///     // ... other methods
/// #   async fn find_valid(&self, _: &str, _: &str, _: DateTime<Utc>, _: Duration) -> Result<Option<VerificationCode>, DomainError> { Ok(None) }
/// #   async fn mark_used(&self, _: CodeId) -> Result<bool, DomainError> { Ok(false) }
/// #   async fn purge_older_than(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> { Ok(0) }
/// #   async fn count_pending(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> { Ok(0) }
/// }
/// ```
#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Append a new unused code row
    ///
    /// Never fails because an identical (phone, code) pair already exists and
    /// never overwrites existing rows.
    ///
    /// # Returns
    /// * `Ok(CodeId)` - Identifier of the new row
    /// * `Err(DomainError)` - Storage failure
    async fn insert(
        &self,
        phone: &str,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<CodeId, DomainError>;

    /// Find a redeemable row
    ///
    /// Matches `phone` and `code` exactly, `used = false` and
    /// `created_at > now - ttl`. When several rows match, the one with the
    /// earliest `created_at` (then lowest id) is returned.
    async fn find_valid(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Option<VerificationCode>, DomainError>;

    /// Mark a row as used with a single conditional write
    ///
    /// # Returns
    /// * `Ok(true)` - This call flipped `used` from false to true
    /// * `Ok(false)` - The row was already used or no longer exists
    /// * `Err(DomainError)` - Storage failure
    async fn mark_used(&self, id: CodeId) -> Result<bool, DomainError>;

    /// Delete every row with `created_at <= now - ttl`, used or not
    ///
    /// # Returns
    /// * `Ok(count)` - Number of rows deleted
    async fn purge_older_than(&self, now: DateTime<Utc>, ttl: Duration)
        -> Result<u64, DomainError>;

    /// Count unused, unexpired rows across all phones
    async fn count_pending(&self, now: DateTime<Utc>, ttl: Duration) -> Result<u64, DomainError>;
}
