//! Application state and factory
//!
//! This module holds the shared application state and provides the factory
//! for creating the Actix-web application.

use std::sync::Arc;
use std::time::Instant;

use actix_web::{web, App, HttpResponse};
use once_cell::sync::Lazy;
use tracing_actix_web::TracingLogger;

use vc_core::repositories::{CodeRepository, UserRepository};
use vc_core::services::verification::VerificationService;
use vc_shared::config::{AdminConfig, Environment};
use vc_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::middleware::{create_cors, security_headers};
use crate::routes::{admin, health, verification};

/// Process start, for the health endpoint's uptime
static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Seconds since the process first touched the start marker
pub fn uptime_seconds() -> u64 {
    STARTED_AT.elapsed().as_secs()
}

/// State shared by every handler
pub struct AppState<C, U>
where
    C: CodeRepository,
    U: UserRepository,
{
    pub verification: Arc<VerificationService<C, U>>,
    pub admin: AdminConfig,
    pub environment: Environment,
}

impl<C, U> AppState<C, U>
where
    C: CodeRepository,
    U: UserRepository,
{
    pub fn new(
        verification: Arc<VerificationService<C, U>>,
        admin: AdminConfig,
        environment: Environment,
    ) -> Self {
        Lazy::force(&STARTED_AT);
        Self {
            verification,
            admin,
            environment,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<C, U>(
    app_state: web::Data<AppState<C, U>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    C: CodeRepository + 'static,
    U: UserRepository + 'static,
{
    let cors = create_cors(app_state.environment);
    let security = security_headers(app_state.environment);

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Order matters: security headers innermost, tracing outermost
        .wrap(security)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/verify", web::post().to(verification::verify::<C, U>))
                .route("/issue", web::post().to(verification::issue::<C, U>)),
        )
        .service(
            web::scope("/admin")
                .route("/assist", web::post().to(admin::assist::<C, U>))
                .route("/stats", web::get().to(admin::stats::<C, U>)),
        )
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
