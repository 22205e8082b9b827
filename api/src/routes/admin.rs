//! Admin endpoints guarded by the shared admin key

use actix_web::{web, HttpResponse};
use validator::Validate;

use vc_core::repositories::{CodeRepository, UserRepository};

use crate::app::AppState;
use crate::dto::{AdminAssistRequest, AdminStatsQuery, StatsResponse};
use crate::handlers::{forbidden_response, handle_domain_error, validation_error_response};

use super::verification::redeem_response;

/// Handler for POST /admin/assist
///
/// Lets an operator redeem a code on a user's behalf. Same outcomes as
/// `/api/verify` once the admin key is accepted.
pub async fn assist<C, U>(
    state: web::Data<AppState<C, U>>,
    request: web::Json<AdminAssistRequest>,
) -> HttpResponse
where
    C: CodeRepository + 'static,
    U: UserRepository + 'static,
{
    if !state.admin.is_authorized(&request.admin_key) {
        tracing::warn!(event = "admin_rejected", "Admin assist with invalid key");
        return forbidden_response();
    }

    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    redeem_response(&state, &request.phone, &request.code).await
}

/// Handler for GET /admin/stats?admin_key=...
pub async fn stats<C, U>(
    state: web::Data<AppState<C, U>>,
    query: web::Query<AdminStatsQuery>,
) -> HttpResponse
where
    C: CodeRepository + 'static,
    U: UserRepository + 'static,
{
    if !state.admin.is_authorized(&query.admin_key) {
        tracing::warn!(event = "admin_rejected", "Admin stats with invalid key");
        return forbidden_response();
    }

    match state.verification.stats().await {
        Ok(stats) => HttpResponse::Ok().json(StatsResponse {
            success: true,
            active_users: stats.active_users,
            pending_codes: stats.pending_codes,
        }),
        Err(error) => handle_domain_error(error),
    }
}
