//! Main verification service implementation

use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;

use vc_shared::utils::phone::{mask_phone_number, normalize_phone_number};

use crate::domain::entities::user::UserStatus;
use crate::domain::entities::verification_code::{code_ttl, VerificationCode};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::code::CodeRepository;
use crate::repositories::user::UserRepository;
use crate::services::notification::{IssuedCodeEvent, NotificationQueue, NotificationStatus};

use super::config::VerificationServiceConfig;
use super::generator::{CodeGenerator, RandomCodeGenerator};
use super::types::{ActivationStatus, IssueOutcome, RedeemOutcome, VerificationStats};

/// Issues and redeems phone verification codes
///
/// The service is the only component that writes the `used` flag. It holds no
/// lock of its own; single-use redemption relies on the store's conditional
/// `mark_used`, so one instance can be shared across any number of handlers.
pub struct VerificationService<C, U, G = RandomCodeGenerator>
where
    C: CodeRepository,
    U: UserRepository,
    G: CodeGenerator,
{
    /// Code store
    codes: Arc<C>,
    /// User registry
    users: Arc<U>,
    /// Source of fresh codes
    generator: G,
    /// Service configuration
    config: VerificationServiceConfig,
    /// Queue for issued-code notifications, if a notifier is running
    notifications: Option<NotificationQueue>,
    /// Code lifetime
    ttl: Duration,
}

impl<C, U> VerificationService<C, U, RandomCodeGenerator>
where
    C: CodeRepository,
    U: UserRepository,
{
    /// Create a new verification service backed by the OS random generator
    ///
    /// # Arguments
    ///
    /// * `codes` - Code store implementation
    /// * `users` - User registry implementation
    /// * `config` - Service configuration
    pub fn new(codes: Arc<C>, users: Arc<U>, config: VerificationServiceConfig) -> Self {
        Self::with_generator(codes, users, RandomCodeGenerator, config)
    }
}

impl<C, U, G> VerificationService<C, U, G>
where
    C: CodeRepository,
    U: UserRepository,
    G: CodeGenerator,
{
    /// Create a service with a caller-supplied code generator
    pub fn with_generator(
        codes: Arc<C>,
        users: Arc<U>,
        generator: G,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            codes,
            users,
            generator,
            config,
            notifications: None,
            ttl: code_ttl(),
        }
    }

    /// Attach the queue consumed by a running `Notifier`
    pub fn with_notifications(mut self, queue: NotificationQueue) -> Self {
        self.notifications = Some(queue);
        self
    }

    /// Issue a new code for a phone number
    pub async fn issue(&self, phone: &str) -> DomainResult<IssueOutcome> {
        self.issue_at(phone, Utc::now()).await
    }

    /// Issue a new code, stamping the stored row with `now`
    ///
    /// The phone is normalized by stripping one leading `+`. No check is made
    /// for an outstanding code: every call inserts an independent row.
    ///
    /// # Returns
    ///
    /// * `Ok(IssueOutcome)` - Code persisted; `notification` reports whether the
    ///   admin notification was queued
    /// * `Err(DomainError::Validation)` - Phone is empty
    /// * `Err(DomainError::StoreUnavailable | StoreTimeout)` - Insert failed
    pub async fn issue_at(&self, phone: &str, now: DateTime<Utc>) -> DomainResult<IssueOutcome> {
        let phone = normalize_phone_number(phone);
        if phone.is_empty() {
            return Err(DomainError::Validation {
                message: "Phone number is required".to_string(),
            });
        }

        let code = self.generator.generate();
        let code_id = self
            .with_deadline("insert", self.codes.insert(&phone, &code, now))
            .await?;

        tracing::info!(
            phone = %mask_phone_number(&phone),
            code_id = %code_id,
            event = "code_issued",
            "Issued verification code"
        );

        let notification = match &self.notifications {
            Some(queue) => queue.try_enqueue(IssuedCodeEvent {
                code_id,
                phone: phone.clone(),
                code: code.clone(),
                issued_at: now,
            }),
            None => NotificationStatus::Disabled,
        };

        Ok(IssueOutcome {
            code_id,
            phone,
            code,
            issued_at: now,
            notification,
        })
    }

    /// Redeem a code against the current time
    pub async fn redeem(&self, phone: &str, code: &str) -> DomainResult<RedeemOutcome> {
        self.redeem_at(phone, code, Utc::now()).await
    }

    /// Redeem a code as of `now`
    ///
    /// Wrong, expired, already-used and foreign codes all yield
    /// `RedeemOutcome::Rejected`. Store failures are returned as errors and
    /// are never folded into a rejection.
    ///
    /// Surrounding whitespace is ignored in the code but not in the phone:
    /// the phone only loses one leading `+`, so `" +15551234567"` and
    /// `"+15551234567"` name different rows.
    ///
    /// When the conditional claim is lost to a concurrent caller the lookup is
    /// repeated, so another unused row with the same phone and code can still
    /// be consumed. The loop ends because each iteration either consumes a row
    /// or observes one that another caller consumed.
    pub async fn redeem_at(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<RedeemOutcome> {
        let phone = normalize_phone_number(phone);
        let code = code.trim();
        let masked = mask_phone_number(&phone);

        if phone.is_empty() || !VerificationCode::is_well_formed(code) {
            tracing::info!(
                phone = %masked,
                event = "code_rejected",
                reason = "malformed",
                "Rejected malformed verification request"
            );
            return Ok(RedeemOutcome::Rejected);
        }

        loop {
            let candidate = self
                .with_deadline("find_valid", self.codes.find_valid(&phone, code, now, self.ttl))
                .await?;

            let Some(row) = candidate else {
                tracing::info!(
                    phone = %masked,
                    event = "code_rejected",
                    "No valid verification code matched"
                );
                return Ok(RedeemOutcome::Rejected);
            };

            let claimed = self
                .with_deadline("mark_used", self.codes.mark_used(row.id))
                .await?;

            if !claimed {
                tracing::debug!(
                    phone = %masked,
                    code_id = %row.id,
                    event = "redeem_race_lost",
                    "Verification code was consumed concurrently"
                );
                continue;
            }

            tracing::info!(
                phone = %masked,
                code_id = %row.id,
                event = "code_redeemed",
                "Verification code redeemed"
            );

            let activation = match self
                .with_deadline("activate", self.users.activate(&phone, now))
                .await
            {
                Ok(()) => ActivationStatus::Activated,
                Err(e) => {
                    tracing::error!(
                        phone = %masked,
                        code_id = %row.id,
                        error = %e,
                        event = "partial_activation",
                        "Code consumed but user activation failed"
                    );
                    ActivationStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            return Ok(RedeemOutcome::Redeemed {
                code_id: row.id,
                activation,
            });
        }
    }

    /// Record a pending user for a phone that just requested a code
    pub async fn register_pending(&self, phone: &str) -> DomainResult<()> {
        let phone = normalize_phone_number(phone);
        if phone.is_empty() {
            return Err(DomainError::Validation {
                message: "Phone number is required".to_string(),
            });
        }
        self.with_deadline("register_pending", self.users.register_pending(&phone, Utc::now()))
            .await
    }

    /// Registration statistics as of now
    pub async fn stats(&self) -> DomainResult<VerificationStats> {
        self.stats_at(Utc::now()).await
    }

    /// Active users and codes still redeemable at `now`
    pub async fn stats_at(&self, now: DateTime<Utc>) -> DomainResult<VerificationStats> {
        let active_users = self
            .with_deadline("count_by_status", self.users.count_by_status(UserStatus::Active))
            .await?;
        let pending_codes = self
            .with_deadline("count_pending", self.codes.count_pending(now, self.ttl))
            .await?;

        Ok(VerificationStats {
            active_users,
            pending_codes,
        })
    }

    /// Code lifetime used for lookups
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Run a store call under the configured deadline
    async fn with_deadline<T, F>(&self, operation: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if e.is_store_failure() {
                    tracing::warn!(
                        operation = operation,
                        error = %e,
                        event = "store_unavailable",
                        "Store call failed"
                    );
                }
                Err(e)
            }
            Err(_) => {
                let timeout_ms = self.config.store_timeout.as_millis() as u64;
                tracing::warn!(
                    operation = operation,
                    timeout_ms = timeout_ms,
                    event = "store_timeout",
                    "Store call exceeded deadline"
                );
                Err(DomainError::StoreTimeout {
                    operation,
                    timeout_ms,
                })
            }
        }
    }
}
