//! User entity representing a phone number known to the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activation status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Shared a contact but has not redeemed a code yet
    Pending,
    /// Redeemed a verification code
    Active,
}

impl UserStatus {
    /// Database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserStatus::Pending),
            "active" => Ok(UserStatus::Active),
            other => Err(format!("Unknown user status: {}", other)),
        }
    }
}

/// User entity keyed by normalized phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Normalized phone number, unique across users
    pub phone: String,

    /// Activation status
    pub status: UserStatus,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the given status
    pub fn new(phone: String, status: UserStatus, at: DateTime<Utc>) -> Self {
        Self {
            phone,
            status,
            created_at: at,
            updated_at: at,
        }
    }

    /// Marks the user as active
    pub fn activate(&mut self, at: DateTime<Utc>) {
        self.status = UserStatus::Active;
        self.updated_at = at;
    }

    /// Whether the user has completed verification
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
