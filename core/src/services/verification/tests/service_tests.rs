//! Unit tests for verification service

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use crate::domain::entities::user::UserStatus;
use crate::domain::entities::verification_code::{code_ttl, CODE_LENGTH};
use crate::errors::DomainError;
use crate::repositories::code::{CodeRepository, MemoryCodeRepository};
use crate::repositories::user::{MemoryUserRepository, UserRepository};
use crate::services::notification::{NotificationStatus, Notifier};
use crate::services::verification::{
    ActivationStatus, RedeemOutcome, VerificationService, VerificationServiceConfig,
};

use super::mocks::{
    ContendedCodeRepository, FailingCodeRepository, FailingSink, FailingUserRepository,
    RecordingSink, SequenceCodeGenerator, StalledCodeRepository,
};

const PHONE: &str = "15551234567";

fn memory_service(
    codes: &[&str],
) -> (
    VerificationService<MemoryCodeRepository, MemoryUserRepository, SequenceCodeGenerator>,
    Arc<MemoryCodeRepository>,
    Arc<MemoryUserRepository>,
) {
    let code_repo = Arc::new(MemoryCodeRepository::new());
    let user_repo = Arc::new(MemoryUserRepository::new());
    let service = VerificationService::with_generator(
        code_repo.clone(),
        user_repo.clone(),
        SequenceCodeGenerator::new(codes),
        VerificationServiceConfig::default(),
    );
    (service, code_repo, user_repo)
}

#[tokio::test]
async fn test_issue_persists_unused_code() {
    let code_repo = Arc::new(MemoryCodeRepository::new());
    let user_repo = Arc::new(MemoryUserRepository::new());
    let service = VerificationService::new(
        code_repo.clone(),
        user_repo,
        VerificationServiceConfig::default(),
    );

    let outcome = service.issue(PHONE).await.unwrap();
    assert_eq!(outcome.code.len(), CODE_LENGTH);
    assert_eq!(outcome.phone, PHONE);
    assert_eq!(outcome.notification, NotificationStatus::Disabled);

    let row = code_repo.get(outcome.code_id).await.unwrap();
    assert_eq!(row.code, outcome.code);
    assert_eq!(row.created_at, outcome.issued_at);
    assert!(!row.used);
}

#[tokio::test]
async fn test_issue_strips_single_leading_plus() {
    let (service, code_repo, _) = memory_service(&["482913", "482914"]);

    let first = service.issue("+15551234567").await.unwrap();
    assert_eq!(first.phone, PHONE);

    let second = service.issue("++15551234567").await.unwrap();
    assert_eq!(second.phone, "+15551234567");

    assert_eq!(code_repo.get(first.code_id).await.unwrap().phone, PHONE);
}

#[tokio::test]
async fn test_issue_rejects_empty_phone() {
    let (service, code_repo, _) = memory_service(&["482913"]);

    let result = service.issue("+").await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(code_repo.is_empty().await);
}

#[tokio::test]
async fn test_redeem_succeeds_once_and_activates_user() {
    let (service, _, user_repo) = memory_service(&["482913"]);
    let now = Utc::now();

    let issued = service.issue_at(PHONE, now).await.unwrap();
    assert_eq!(issued.code, "482913");

    let outcome = service.redeem_at(PHONE, "482913", now).await.unwrap();
    assert_eq!(
        outcome,
        RedeemOutcome::Redeemed {
            code_id: issued.code_id,
            activation: ActivationStatus::Activated,
        }
    );

    let user = user_repo.find_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(user.status, UserStatus::Active);

    let again = service.redeem_at(PHONE, "482913", now).await.unwrap();
    assert_eq!(again, RedeemOutcome::Rejected);
}

#[tokio::test]
async fn test_redeem_accepts_plus_prefixed_phone() {
    let (service, _, _) = memory_service(&["482913"]);
    let now = Utc::now();

    service.issue_at(PHONE, now).await.unwrap();
    let outcome = service.redeem_at("+15551234567", "482913", now).await.unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_redeem_after_expiry_is_rejected() {
    let (service, code_repo, user_repo) = memory_service(&["482913"]);
    let issued_at = Utc::now();
    let issued = service.issue_at(PHONE, issued_at).await.unwrap();

    let expired = issued_at + code_ttl() + Duration::milliseconds(1);
    let outcome = service.redeem_at(PHONE, "482913", expired).await.unwrap();

    assert_eq!(outcome, RedeemOutcome::Rejected);
    assert!(!code_repo.get(issued.code_id).await.unwrap().used);
    assert!(user_repo.find_by_phone(PHONE).await.unwrap().is_none());
}

#[tokio::test]
async fn test_redeem_just_inside_window() {
    let (service, _, _) = memory_service(&["482913"]);
    let issued_at = Utc::now();
    service.issue_at(PHONE, issued_at).await.unwrap();

    let almost = issued_at + code_ttl() - Duration::seconds(1);
    assert!(service.redeem_at(PHONE, "482913", almost).await.unwrap().is_success());
}

#[tokio::test]
async fn test_redeem_never_issued_code_is_rejected() {
    let (service, _, _) = memory_service(&["482913"]);
    let now = Utc::now();
    service.issue_at(PHONE, now).await.unwrap();

    assert_eq!(
        service.redeem_at(PHONE, "482914", now).await.unwrap(),
        RedeemOutcome::Rejected
    );
    assert_eq!(
        service.redeem_at("15550000000", "482913", now).await.unwrap(),
        RedeemOutcome::Rejected
    );
}

#[tokio::test]
async fn test_redeem_malformed_code_is_rejected() {
    let (service, _, _) = memory_service(&["482913"]);
    let now = Utc::now();
    service.issue_at(PHONE, now).await.unwrap();

    for code in ["", "48291", "4829133", "48291a", " "] {
        assert_eq!(
            service.redeem_at(PHONE, code, now).await.unwrap(),
            RedeemOutcome::Rejected,
            "code {:?} should be rejected",
            code
        );
    }

    // Surrounding whitespace is tolerated
    assert!(service.redeem_at(PHONE, " 482913 ", now).await.unwrap().is_success());
}

#[tokio::test]
async fn test_phone_whitespace_is_not_normalized() {
    let (service, _, _) = memory_service(&["482913"]);
    let now = Utc::now();

    let issued = service.issue_at(" +15551234567", now).await.unwrap();
    assert_eq!(issued.phone, " +15551234567");

    assert_eq!(
        service.redeem_at("+15551234567", "482913", now).await.unwrap(),
        RedeemOutcome::Rejected
    );
    assert!(service
        .redeem_at(" +15551234567", " 482913", now)
        .await
        .unwrap()
        .is_success());
}

#[tokio::test]
async fn test_two_issues_produce_independent_codes() {
    let (service, code_repo, _) = memory_service(&["111111", "222222"]);
    let now = Utc::now();

    let first = service.issue_at(PHONE, now).await.unwrap();
    let second = service.issue_at(PHONE, now).await.unwrap();
    assert_ne!(first.code_id, second.code_id);

    assert!(service.redeem_at(PHONE, "222222", now).await.unwrap().is_success());
    assert!(!code_repo.get(first.code_id).await.unwrap().used);

    assert!(service.redeem_at(PHONE, "111111", now).await.unwrap().is_success());
}

#[tokio::test]
async fn test_identical_codes_are_consumed_earliest_first() {
    let (service, code_repo, _) = memory_service(&["555555", "555555"]);
    let now = Utc::now();

    let older = service.issue_at(PHONE, now - Duration::minutes(3)).await.unwrap();
    let newer = service.issue_at(PHONE, now).await.unwrap();

    let outcome = service.redeem_at(PHONE, "555555", now).await.unwrap();
    assert_eq!(
        outcome,
        RedeemOutcome::Redeemed {
            code_id: older.code_id,
            activation: ActivationStatus::Activated,
        }
    );
    assert!(!code_repo.get(newer.code_id).await.unwrap().used);

    assert!(service.redeem_at(PHONE, "555555", now).await.unwrap().is_success());
    assert_eq!(
        service.redeem_at(PHONE, "555555", now).await.unwrap(),
        RedeemOutcome::Rejected
    );
}

#[tokio::test]
async fn test_lost_claim_falls_through_to_next_matching_row() {
    let code_repo = Arc::new(ContendedCodeRepository::default());
    let service = VerificationService::with_generator(
        code_repo.clone(),
        Arc::new(MemoryUserRepository::new()),
        SequenceCodeGenerator::new(&["777777"]),
        VerificationServiceConfig::default(),
    );
    let now = Utc::now();

    let first = service.issue_at(PHONE, now - Duration::minutes(1)).await.unwrap();
    let second = service.issue_at(PHONE, now).await.unwrap();

    let outcome = service.redeem_at(PHONE, "777777", now).await.unwrap();
    assert_eq!(
        outcome,
        RedeemOutcome::Redeemed {
            code_id: second.code_id,
            activation: ActivationStatus::Activated,
        }
    );
    assert!(code_repo.inner.get(first.code_id).await.unwrap().used);
}

#[tokio::test]
async fn test_lost_claim_on_only_row_is_rejected() {
    let service = VerificationService::with_generator(
        Arc::new(ContendedCodeRepository::default()),
        Arc::new(MemoryUserRepository::new()),
        SequenceCodeGenerator::new(&["777777"]),
        VerificationServiceConfig::default(),
    );
    let now = Utc::now();
    service.issue_at(PHONE, now).await.unwrap();

    assert_eq!(
        service.redeem_at(PHONE, "777777", now).await.unwrap(),
        RedeemOutcome::Rejected
    );
}

#[tokio::test]
async fn test_store_failure_is_not_a_rejection() {
    let service = VerificationService::new(
        Arc::new(FailingCodeRepository),
        Arc::new(MemoryUserRepository::new()),
        VerificationServiceConfig::default(),
    );

    let issue = service.issue(PHONE).await;
    assert!(matches!(
        issue,
        Err(DomainError::StoreUnavailable { operation: "insert", .. })
    ));

    let redeem = service.redeem(PHONE, "482913").await.unwrap_err();
    assert!(redeem.is_store_failure());
    assert!(redeem.is_retryable());
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_times_out() {
    let config = VerificationServiceConfig {
        store_timeout: StdDuration::from_millis(250),
    };
    let service = VerificationService::with_generator(
        Arc::new(StalledCodeRepository::default()),
        Arc::new(MemoryUserRepository::new()),
        SequenceCodeGenerator::new(&["482913"]),
        config,
    );

    service.issue(PHONE).await.unwrap();
    let err = service.redeem(PHONE, "482913").await.unwrap_err();
    assert_eq!(
        err,
        DomainError::StoreTimeout {
            operation: "find_valid",
            timeout_ms: 250,
        }
    );
}

#[tokio::test]
async fn test_registry_failure_is_partial_activation() {
    let code_repo = Arc::new(MemoryCodeRepository::new());
    let user_repo = Arc::new(FailingUserRepository::default());
    let service = VerificationService::with_generator(
        code_repo.clone(),
        user_repo.clone(),
        SequenceCodeGenerator::new(&["482913"]),
        VerificationServiceConfig::default(),
    );
    let now = Utc::now();

    let issued = service.issue_at(PHONE, now).await.unwrap();
    let outcome = service.redeem_at(PHONE, "482913", now).await.unwrap();

    assert!(outcome.is_success());
    assert!(outcome.is_partial_activation());
    match outcome {
        RedeemOutcome::Redeemed {
            activation: ActivationStatus::Failed { reason },
            ..
        } => assert!(reason.contains("deadlock detected")),
        other => panic!("Expected partial activation, got {:?}", other),
    }

    // The code stays consumed and is not redeemable again
    assert!(code_repo.get(issued.code_id).await.unwrap().used);
    assert_eq!(
        service.redeem_at(PHONE, "482913", now).await.unwrap(),
        RedeemOutcome::Rejected
    );
    assert!(user_repo.find_by_phone(PHONE).await.unwrap().is_none());
}

#[tokio::test]
async fn test_issue_queues_notification() {
    let sink = Arc::new(RecordingSink::default());
    let (notifier, queue) = Notifier::new(sink.clone(), 4);
    let handle = notifier.spawn();

    let (service, _, _) = memory_service(&["482913"]);
    let service = service.with_notifications(queue);

    let outcome = service.issue(PHONE).await.unwrap();
    assert_eq!(outcome.notification, NotificationStatus::Queued);

    drop(service);
    let report = handle.await.unwrap();
    assert_eq!(report.delivered, 1);

    let delivered = sink.delivered();
    assert_eq!(delivered[0].phone, PHONE);
    assert_eq!(delivered[0].code, "482913");
    assert_eq!(delivered[0].code_id, outcome.code_id);
}

#[tokio::test]
async fn test_failing_sink_does_not_affect_issue() {
    let (notifier, queue) = Notifier::new(Arc::new(FailingSink), 4);
    let handle = notifier.spawn();

    let (service, code_repo, _) = memory_service(&["482913"]);
    let service = service.with_notifications(queue);

    let outcome = service.issue(PHONE).await.unwrap();
    assert_eq!(outcome.notification, NotificationStatus::Queued);
    assert!(code_repo.get(outcome.code_id).await.is_some());

    drop(service);
    let report = handle.await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 0);
}

#[tokio::test]
async fn test_stopped_notifier_reports_dropped_notification() {
    let (notifier, queue) = Notifier::new(Arc::new(RecordingSink::default()), 4);
    drop(notifier);

    let (service, _, _) = memory_service(&["482913"]);
    let service = service.with_notifications(queue);

    let outcome = service.issue(PHONE).await.unwrap();
    assert!(matches!(outcome.notification, NotificationStatus::Dropped { .. }));
}

#[tokio::test]
async fn test_register_pending_then_redeem() {
    let (service, _, user_repo) = memory_service(&["482913"]);
    let now = Utc::now();

    service.register_pending("+15551234567").await.unwrap();
    let user = user_repo.find_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(user.status, UserStatus::Pending);

    service.issue_at(PHONE, now).await.unwrap();
    service.redeem_at(PHONE, "482913", now).await.unwrap();

    let user = user_repo.find_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(user.status, UserStatus::Active);
}

#[tokio::test]
async fn test_stats_count_active_users_and_pending_codes() {
    let (service, code_repo, _) = memory_service(&["100001", "100002", "100003"]);
    let now = Utc::now();

    service.issue_at(PHONE, now).await.unwrap();
    service.issue_at("15550000000", now).await.unwrap();
    code_repo
        .insert("15559999999", "999999", now - Duration::minutes(30))
        .await
        .unwrap();
    service.redeem_at(PHONE, "100001", now).await.unwrap();

    let stats = service.stats_at(now).await.unwrap();
    assert_eq!(stats.active_users, 1);
    assert_eq!(stats.pending_codes, 1);
}
