//! Issue and redeem endpoints

use actix_web::{web, HttpResponse};
use validator::Validate;

use vc_core::repositories::{CodeRepository, UserRepository};
use vc_core::services::notification::NotificationStatus;
use vc_core::services::verification::{ActivationStatus, RedeemOutcome};
use vc_shared::utils::phone::mask_phone_number;

use crate::app::AppState;
use crate::dto::{IssueRequest, IssueResponse, VerifyRequest, VerifyResponse};
use crate::handlers::{
    forbidden_response, handle_domain_error, invalid_code_response, partial_activation_response,
    validation_error_response,
};

/// Handler for POST /api/verify
///
/// # Request Body
///
/// ```json
/// { "phone": "+15551234567", "code": "482913" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "success": true, "message": "Phone verified" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing fields, or invalid / expired / used code
/// - 500 Internal Server Error: Code consumed but activation failed
/// - 503 Service Unavailable: Code store unreachable or too slow
pub async fn verify<C, U>(
    state: web::Data<AppState<C, U>>,
    request: web::Json<VerifyRequest>,
) -> HttpResponse
where
    C: CodeRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    redeem_response(&state, &request.phone, &request.code).await
}

/// Handler for POST /api/issue
///
/// Issues a code for the phone and records it as a pending user. The caller
/// is responsible for delivering the returned code, so the request must carry
/// the admin key; anyone else gets 403 before the body is looked at.
pub async fn issue<C, U>(
    state: web::Data<AppState<C, U>>,
    request: web::Json<IssueRequest>,
) -> HttpResponse
where
    C: CodeRepository + 'static,
    U: UserRepository + 'static,
{
    if !state.admin.is_authorized(&request.admin_key) {
        tracing::warn!(event = "issue_rejected", "Code issue with invalid key");
        return forbidden_response();
    }

    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let outcome = match state.verification.issue(&request.phone).await {
        Ok(outcome) => outcome,
        Err(error) => return handle_domain_error(error),
    };

    if let Err(e) = state.verification.register_pending(&outcome.phone).await {
        tracing::warn!(
            phone = %mask_phone_number(&outcome.phone),
            error = %e,
            "Failed to record pending user"
        );
    }

    let notification = match outcome.notification {
        NotificationStatus::Queued => "queued",
        NotificationStatus::Dropped { .. } => "dropped",
        NotificationStatus::Disabled => "disabled",
    };

    HttpResponse::Ok().json(IssueResponse {
        success: true,
        phone: outcome.phone,
        code: outcome.code,
        notification: notification.to_string(),
    })
}

/// Redeem and translate the outcome; shared with the admin assist route
pub(crate) async fn redeem_response<C, U>(
    state: &AppState<C, U>,
    phone: &str,
    code: &str,
) -> HttpResponse
where
    C: CodeRepository,
    U: UserRepository,
{
    match state.verification.redeem(phone, code).await {
        Ok(RedeemOutcome::Redeemed {
            activation: ActivationStatus::Activated,
            ..
        }) => HttpResponse::Ok().json(VerifyResponse {
            success: true,
            message: "Phone verified".to_string(),
        }),
        Ok(RedeemOutcome::Redeemed {
            activation: ActivationStatus::Failed { .. },
            ..
        }) => partial_activation_response(),
        Ok(RedeemOutcome::Rejected) => invalid_code_response(),
        Err(error) => handle_domain_error(error),
    }
}
