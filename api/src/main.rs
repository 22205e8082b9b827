use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use vc_api::app::{create_app, AppState};
use vc_api::telemetry::init_tracing;
use vc_core::repositories::{CodeRepository, MemoryCodeRepository, MemoryUserRepository, UserRepository};
use vc_core::services::notification::Notifier;
use vc_core::services::sweeper::{RetentionSweeper, RetentionSweeperConfig};
use vc_core::services::verification::VerificationService;
use vc_infra::database::{DatabasePool, MySqlCodeRepository, MySqlUserRepository};
use vc_infra::notification::LogNotificationSink;
use vc_shared::config::{AppConfig, StoreBackend};

/// Upper bound for draining queued notifications on shutdown
const NOTIFIER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging).context("failed to install tracing subscriber")?;

    info!(
        environment = %config.environment,
        backend = ?config.store_backend,
        "Starting verification server"
    );

    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; codes and users are lost on restart");
            serve(
                Arc::new(MemoryCodeRepository::new()),
                Arc::new(MemoryUserRepository::new()),
                &config,
            )
            .await
        }
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone())
                .await
                .context("failed to connect to MySQL")?;
            if config.database.run_migrations {
                pool.run_migrations().await.context("failed to run migrations")?;
            }

            let result = serve(
                Arc::new(MySqlCodeRepository::new(pool.get_pool().clone())),
                Arc::new(MySqlUserRepository::new(pool.get_pool().clone())),
                &config,
            )
            .await;

            pool.close().await;
            result
        }
    }
}

/// Wire the engine, sweeper and notifier around the given stores and run
/// the HTTP server until it is told to stop
async fn serve<C, U>(codes: Arc<C>, users: Arc<U>, config: &AppConfig) -> anyhow::Result<()>
where
    C: CodeRepository + 'static,
    U: UserRepository + 'static,
{
    let sink = Arc::new(LogNotificationSink::from(&config.admin));
    let (notifier, queue) = Notifier::new(sink, config.verification.notification_buffer);
    let notifier_task = notifier.spawn();

    let verification = Arc::new(
        VerificationService::new(codes.clone(), users, (&config.verification).into())
            .with_notifications(queue),
    );

    let sweeper_config = RetentionSweeperConfig::from(&config.sweeper)
        .with_store_timeout(Duration::from_millis(config.verification.store_timeout_ms));
    let sweeper = Arc::new(RetentionSweeper::new(codes, sweeper_config)).start();

    let state = web::Data::new(AppState::new(
        verification,
        config.admin.clone(),
        config.environment,
    ));

    if config.admin.secret.is_none() {
        warn!("ADMIN_SECRET is not set; code issue and admin endpoints will reject every request");
    }

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Binding HTTP server");

    let server_state = state.clone();
    let mut server = HttpServer::new(move || create_app(server_state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let served = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server terminated with an error");

    let report = sweeper.stop().await;
    info!(
        cycles = report.cycles,
        purged = report.purged,
        failures = report.failures,
        "Retention sweeper finished"
    );

    // Last queue handle goes with the state; the notifier then drains and exits
    drop(state);
    match tokio::time::timeout(NOTIFIER_DRAIN_TIMEOUT, notifier_task).await {
        Ok(Ok(report)) => info!(
            delivered = report.delivered,
            failed = report.failed,
            "Notifier finished"
        ),
        Ok(Err(e)) => warn!(error = %e, "Notifier task failed"),
        Err(_) => warn!("Notifier did not drain before shutdown timeout"),
    }

    served
}
