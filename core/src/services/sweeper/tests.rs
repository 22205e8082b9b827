//! Tests for the retention sweeper

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::verification_code::{code_ttl, CodeId, VerificationCode};
use crate::errors::DomainError;
use crate::repositories::code::{CodeRepository, MemoryCodeRepository};

use super::{RetentionSweeper, RetentionSweeperConfig, SweeperReport};

const PHONE: &str = "15551234567";

struct UnreachableStore;

#[async_trait]
impl CodeRepository for UnreachableStore {
    async fn insert(&self, _: &str, _: &str, _: DateTime<Utc>) -> Result<CodeId, DomainError> {
        Err(DomainError::store_unavailable("insert", "connection reset"))
    }

    async fn find_valid(
        &self,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
        _: Duration,
    ) -> Result<Option<VerificationCode>, DomainError> {
        Err(DomainError::store_unavailable("find_valid", "connection reset"))
    }

    async fn mark_used(&self, _: CodeId) -> Result<bool, DomainError> {
        Err(DomainError::store_unavailable("mark_used", "connection reset"))
    }

    async fn purge_older_than(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> {
        Err(DomainError::store_unavailable("purge_older_than", "connection reset"))
    }

    async fn count_pending(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> {
        Err(DomainError::store_unavailable("count_pending", "connection reset"))
    }
}

/// Store whose purge never completes
struct StalledStore;

#[async_trait]
impl CodeRepository for StalledStore {
    async fn insert(&self, _: &str, _: &str, _: DateTime<Utc>) -> Result<CodeId, DomainError> {
        Ok(CodeId(1))
    }

    async fn find_valid(
        &self,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
        _: Duration,
    ) -> Result<Option<VerificationCode>, DomainError> {
        Ok(None)
    }

    async fn mark_used(&self, _: CodeId) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn purge_older_than(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> {
        std::future::pending().await
    }

    async fn count_pending(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> {
        Ok(0)
    }
}

fn config(interval_secs: u64) -> RetentionSweeperConfig {
    RetentionSweeperConfig {
        enabled: true,
        interval: StdDuration::from_secs(interval_secs),
        store_timeout: StdDuration::from_millis(250),
    }
}

#[tokio::test]
async fn test_run_once_purges_only_stale_rows() {
    let repo = Arc::new(MemoryCodeRepository::new());
    let now = Utc::now();
    let stale = repo.insert(PHONE, "100000", now - Duration::minutes(11)).await.unwrap();
    let fresh = repo.insert(PHONE, "200000", now - Duration::minutes(1)).await.unwrap();

    let sweeper = RetentionSweeper::new(repo.clone(), config(60));
    let result = sweeper.run_once(now).await.unwrap();

    assert_eq!(result.purged, 1);
    assert_eq!(result.cutoff, now - code_ttl());
    assert!(repo.get(stale).await.is_none());
    assert!(repo.get(fresh).await.is_some());
}

#[tokio::test]
async fn test_run_once_surfaces_store_failure() {
    let sweeper = RetentionSweeper::new(Arc::new(UnreachableStore), config(60));
    let err = sweeper.run_once(Utc::now()).await.unwrap_err();
    assert!(err.is_store_failure());
}

#[tokio::test(start_paused = true)]
async fn test_start_runs_first_cycle_immediately() {
    let repo = Arc::new(MemoryCodeRepository::new());
    repo.insert(PHONE, "100000", Utc::now() - Duration::minutes(30))
        .await
        .unwrap();

    let handle = Arc::new(RetentionSweeper::new(repo.clone(), config(60))).start();
    assert!(handle.is_running());

    tokio::time::sleep(StdDuration::from_millis(10)).await;
    assert!(repo.is_empty().await);

    let report = handle.stop().await;
    assert_eq!(report.cycles, 1);
    assert_eq!(report.purged, 1);
    assert_eq!(report.failures, 0);
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_stop_the_sweeper() {
    let handle = Arc::new(RetentionSweeper::new(Arc::new(UnreachableStore), config(60))).start();

    tokio::time::sleep(StdDuration::from_secs(150)).await;
    assert!(handle.is_running());

    let report = handle.stop().await;
    assert!(report.cycles >= 2);
    assert_eq!(report.failures, report.cycles);
    assert_eq!(report.purged, 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_once_times_out_on_stalled_store() {
    let sweeper = RetentionSweeper::new(Arc::new(StalledStore), config(60));

    let err = sweeper.run_once(Utc::now()).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::StoreTimeout {
            operation: "purge_older_than",
            timeout_ms: 250,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_returns_while_store_is_stalled() {
    let handle = Arc::new(RetentionSweeper::new(Arc::new(StalledStore), config(60))).start();

    // First cycle is stuck inside the purge when stop is requested
    tokio::time::sleep(StdDuration::from_millis(10)).await;
    assert!(handle.is_running());

    let report = tokio::time::timeout(StdDuration::from_secs(5), handle.stop())
        .await
        .expect("stop should not hang on a stalled store");
    assert_eq!(report.cycles, 1);
    assert_eq!(report.failures, 1);
}

#[test]
fn test_config_from_settings_with_store_timeout() {
    let settings = vc_shared::config::SweeperConfig {
        enabled: true,
        interval_seconds: 0,
    };
    let config = RetentionSweeperConfig::from(&settings)
        .with_store_timeout(StdDuration::from_millis(1500));

    assert_eq!(config.interval, StdDuration::from_secs(1));
    assert_eq!(config.store_timeout, StdDuration::from_millis(1500));
}

#[tokio::test]
async fn test_disabled_sweeper_never_starts() {
    let repo = Arc::new(MemoryCodeRepository::new());
    let sweeper = RetentionSweeper::new(
        repo,
        RetentionSweeperConfig {
            enabled: false,
            ..config(60)
        },
    );

    let handle = Arc::new(sweeper).start();
    assert!(!handle.is_running());
    assert_eq!(handle.stop().await, SweeperReport::default());
}
