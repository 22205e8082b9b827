//! Verification code entity for phone-based registration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Validity window of a verification code, counted from creation
pub const CODE_TTL_MINUTES: i64 = 10;

/// Smallest code ever generated; keeps six visible digits
pub const MIN_CODE_VALUE: u32 = 100_000;

/// Largest code ever generated
pub const MAX_CODE_VALUE: u32 = 999_999;

/// The fixed code TTL as a `chrono::Duration`
pub fn code_ttl() -> Duration {
    Duration::minutes(CODE_TTL_MINUTES)
}

/// Store-assigned identifier of a code row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeId(pub i64);

impl std::fmt::Display for CodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored verification code row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Row identifier
    pub id: CodeId,

    /// Normalized phone number (no leading `+`)
    pub phone: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Whether the code has been redeemed
    pub used: bool,
}

impl VerificationCode {
    /// Creates a fresh, unused code row
    pub fn new(id: CodeId, phone: String, code: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            phone,
            code,
            created_at,
            used: false,
        }
    }

    /// Instant after which the code can no longer be redeemed
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.created_at + ttl
    }

    /// A code is expired once `created_at <= now - ttl`
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.created_at <= now - ttl
    }

    /// Checks every redemption predicate against this row
    ///
    /// Phone and code must match exactly, the row must be unused and
    /// unexpired at `now`.
    pub fn is_redeemable_by(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> bool {
        !self.used && self.phone == phone && self.code == code && !self.is_expired_at(now, ttl)
    }

    /// Whether `code` has the shape of an issued code (six ASCII digits)
    pub fn is_well_formed(code: &str) -> bool {
        code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
    }
}
