//! Mapping of domain outcomes and errors to HTTP responses

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use validator::ValidationErrors;

use vc_core::errors::DomainError;
use vc_shared::errors::{error_codes, ErrorResponse};

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Store failures become 503 with a `retryable` detail so clients can tell
/// them apart from a rejected code.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::StoreUnavailable { .. } | DomainError::StoreTimeout { .. } => {
            tracing::warn!(error = %error, "Store failure surfaced to client");
            HttpResponse::ServiceUnavailable().json(
                ErrorResponse::new(
                    error_codes::STORE_UNAVAILABLE,
                    "Verification store is temporarily unavailable. Please try again later",
                )
                .add_detail("retryable", true),
            )
        }
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            format!("Resource not found: {}", resource),
        )),
        DomainError::Internal { message } => {
            tracing::error!(error = %message, "Internal error");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 for a wrong, expired or already used code
pub fn invalid_code_response() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VERIFICATION_CODE_INVALID,
        "Invalid or expired code",
    ))
}

/// 500 for a consumed code whose user could not be activated
pub fn partial_activation_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(
        ErrorResponse::new(
            error_codes::ACTIVATION_FAILED,
            "Code accepted but activation failed. Please contact support",
        )
        .add_detail("code_consumed", true),
    )
}

/// 403 for a missing or wrong admin key
pub fn forbidden_response() -> HttpResponse {
    HttpResponse::Forbidden().json(ErrorResponse::new(error_codes::FORBIDDEN, "Access denied"))
}

/// 400 listing the failed fields
pub fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
            .add_detail("validation_errors", errors),
    )
}

/// Error handler for `web::JsonConfig` producing the shared error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        format!("Malformed request body: {}", err),
    ));
    actix_web::error::InternalError::from_response(err, response).into()
}
