//! Request and response bodies

pub mod verification;

pub use verification::{
    AdminAssistRequest, AdminStatsQuery, HealthResponse, IssueRequest, IssueResponse,
    StatsResponse, VerifyRequest, VerifyResponse,
};
