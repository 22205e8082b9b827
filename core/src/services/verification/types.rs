//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::verification_code::CodeId;
use crate::services::notification::NotificationStatus;

/// Result of issuing a verification code
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    /// Identifier of the stored row
    pub code_id: CodeId,
    /// Normalized phone the code is bound to
    pub phone: String,
    /// The code to deliver to the user
    pub code: String,
    /// Creation timestamp of the row
    pub issued_at: DateTime<Utc>,
    /// Whether the side notification was handed to the notifier
    pub notification: NotificationStatus,
}

/// Outcome of the user activation that follows a successful redemption
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationStatus {
    /// The user registry now reports the phone as active
    Activated,
    /// The code was consumed but the registry write failed
    Failed { reason: String },
}

/// Result of redeeming a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Wrong code, wrong phone, expired or already used
    Rejected,
    /// The code was consumed by this call
    Redeemed {
        code_id: CodeId,
        activation: ActivationStatus,
    },
}

impl RedeemOutcome {
    /// Whether this call consumed a code
    pub fn is_success(&self) -> bool {
        matches!(self, RedeemOutcome::Redeemed { .. })
    }

    /// Code consumed, user not activated
    pub fn is_partial_activation(&self) -> bool {
        matches!(
            self,
            RedeemOutcome::Redeemed {
                activation: ActivationStatus::Failed { .. },
                ..
            }
        )
    }
}

/// Registration statistics for the admin view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationStats {
    /// Users with status active
    pub active_users: u64,
    /// Unused codes still inside the TTL window
    pub pending_codes: u64,
}
