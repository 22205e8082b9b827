//! Retention sweeper service and its background task

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use vc_shared::config::SweeperConfig;

use crate::domain::entities::verification_code::code_ttl;
use crate::errors::DomainError;
use crate::repositories::code::CodeRepository;

/// Configuration for the retention sweeper
#[derive(Debug, Clone)]
pub struct RetentionSweeperConfig {
    /// Whether to run the background task
    pub enabled: bool,
    /// Time between purge cycles
    pub interval: std::time::Duration,
    /// Deadline for a single purge call
    pub store_timeout: std::time::Duration,
}

impl RetentionSweeperConfig {
    /// Use the same store deadline as the verification engine
    pub fn with_store_timeout(mut self, store_timeout: std::time::Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }
}

impl Default for RetentionSweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: std::time::Duration::from_secs(60),
            store_timeout: std::time::Duration::from_secs(5),
        }
    }
}

impl From<&SweeperConfig> for RetentionSweeperConfig {
    fn from(config: &SweeperConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: std::time::Duration::from_secs(config.interval_seconds.max(1)),
            ..Self::default()
        }
    }
}

/// Service purging stale rows from the code store
pub struct RetentionSweeper<C: CodeRepository + 'static> {
    codes: Arc<C>,
    config: RetentionSweeperConfig,
    ttl: Duration,
}

impl<C: CodeRepository> RetentionSweeper<C> {
    /// Create a new retention sweeper
    pub fn new(codes: Arc<C>, config: RetentionSweeperConfig) -> Self {
        Self {
            codes,
            config,
            ttl: code_ttl(),
        }
    }

    /// Run a single purge cycle as of `now`
    ///
    /// # Returns
    /// * `Ok(SweepResult)` - Rows deleted and the cutoff used
    /// * `Err(DomainError)` - If the store rejected the delete or missed the
    ///   deadline
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<SweepResult, DomainError> {
        let cutoff = now - self.ttl;
        let deadline = self.config.store_timeout;

        let purge = self.codes.purge_older_than(now, self.ttl);
        let purge = match tokio::time::timeout(deadline, purge).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::StoreTimeout {
                operation: "purge_older_than",
                timeout_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match purge {
            Ok(purged) => {
                info!(
                    purged = purged,
                    cutoff = %cutoff,
                    event = "sweep_completed",
                    "Purged stale verification codes"
                );
                Ok(SweepResult { purged, cutoff })
            }
            Err(e) => {
                error!(
                    error = %e,
                    event = "sweep_failed",
                    "Failed to purge stale verification codes"
                );
                Err(e)
            }
        }
    }

    /// Start the sweeper as a background task
    ///
    /// The first cycle runs immediately, then one per interval. The task runs
    /// until [`SweeperHandle::stop`] is awaited or the handle is dropped.
    pub fn start(self: Arc<Self>) -> SweeperHandle {
        if !self.config.enabled {
            warn!("Retention sweeper is disabled");
            return SweeperHandle {
                shutdown: None,
                task: None,
            };
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = self.config.interval;

        let task = tokio::spawn(async move {
            info!(
                interval_seconds = period.as_secs(),
                "Retention sweeper started"
            );

            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut report = SweeperReport::default();

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = timer.tick() => {
                        report.cycles += 1;
                        match self.run_once(Utc::now()).await {
                            Ok(result) => report.purged += result.purged,
                            Err(_) => report.failures += 1,
                        }
                    }
                }
            }

            info!(
                cycles = report.cycles,
                purged = report.purged,
                failures = report.failures,
                "Retention sweeper stopped"
            );
            report
        });

        SweeperHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Result of one purge cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of rows deleted
    pub purged: u64,
    /// Rows created at or before this instant were eligible
    pub cutoff: DateTime<Utc>,
}

/// Totals accumulated by a background sweeper over its lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweeperReport {
    pub cycles: u64,
    pub purged: u64,
    pub failures: u64,
}

/// Owner of a running sweeper task
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<SweeperReport>>,
}

impl SweeperHandle {
    /// Whether the background task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signal the task and wait for it to finish its current cycle
    pub async fn stop(mut self) -> SweeperReport {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        match self.task.take() {
            Some(task) => match task.await {
                Ok(report) => report,
                Err(e) => {
                    error!(error = %e, "Retention sweeper task panicked");
                    SweeperReport::default()
                }
            },
            None => SweeperReport::default(),
        }
    }
}
