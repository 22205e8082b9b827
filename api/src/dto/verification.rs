//! DTOs for the verification endpoints
//!
//! Request fields default to empty strings so that a missing field reaches
//! validation and produces the JSON error body instead of an extractor error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/verify`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct VerifyRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 16, message = "Code is required"))]
    pub code: String,
}

/// Response body for a successful verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
}

/// Request body for `POST /api/issue`
///
/// Issuing is reserved for the messaging collaborator that has already seen
/// the user share their contact, so it carries the admin key.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct IssueRequest {
    #[serde(default)]
    pub admin_key: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,
}

/// Response body for an issued code
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssueResponse {
    pub success: bool,
    /// Normalized phone the code is bound to
    pub phone: String,
    pub code: String,
    /// `queued`, `dropped` or `disabled`
    pub notification: String,
}

/// Request body for `POST /admin/assist`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AdminAssistRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Admin key is required"))]
    pub admin_key: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 16, message = "Code is required"))]
    pub code: String,
}

/// Query string for `GET /admin/stats`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminStatsQuery {
    #[serde(default)]
    pub admin_key: String,
}

/// Response body for `GET /admin/stats`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub active_users: u64,
    pub pending_codes: u64,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
}
