//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use vc_api::app::AppState;
use vc_core::domain::entities::user::{User, UserStatus};
use vc_core::domain::entities::verification_code::{CodeId, VerificationCode};
use vc_core::errors::DomainError;
use vc_core::repositories::{CodeRepository, MemoryCodeRepository, MemoryUserRepository, UserRepository};
use vc_core::services::verification::{VerificationService, VerificationServiceConfig};
use vc_shared::config::{AdminConfig, Environment};

pub const ADMIN_SECRET: &str = "test-admin-secret";

pub fn admin_config() -> AdminConfig {
    AdminConfig {
        secret: Some(ADMIN_SECRET.to_string()),
        admin_ids: vec!["1001".to_string()],
    }
}

pub fn state_with<C, U>(codes: Arc<C>, users: Arc<U>, admin: AdminConfig) -> web::Data<AppState<C, U>>
where
    C: CodeRepository,
    U: UserRepository,
{
    let verification = Arc::new(VerificationService::new(
        codes,
        users,
        VerificationServiceConfig::default(),
    ));
    web::Data::new(AppState::new(verification, admin, Environment::Development))
}

pub struct MemoryFixture {
    pub state: web::Data<AppState<MemoryCodeRepository, MemoryUserRepository>>,
    pub codes: Arc<MemoryCodeRepository>,
    pub users: Arc<MemoryUserRepository>,
}

pub fn memory_fixture() -> MemoryFixture {
    let codes = Arc::new(MemoryCodeRepository::new());
    let users = Arc::new(MemoryUserRepository::new());
    let state = state_with(codes.clone(), users.clone(), admin_config());
    MemoryFixture { state, codes, users }
}

/// Code store that is always unreachable
pub struct DownCodeRepository;

#[async_trait]
impl CodeRepository for DownCodeRepository {
    async fn insert(&self, _: &str, _: &str, _: DateTime<Utc>) -> Result<CodeId, DomainError> {
        Err(DomainError::store_unavailable("insert", "connection refused"))
    }

    async fn find_valid(
        &self,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
        _: Duration,
    ) -> Result<Option<VerificationCode>, DomainError> {
        Err(DomainError::store_unavailable("find_valid", "connection refused"))
    }

    async fn mark_used(&self, _: CodeId) -> Result<bool, DomainError> {
        Err(DomainError::store_unavailable("mark_used", "connection refused"))
    }

    async fn purge_older_than(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> {
        Err(DomainError::store_unavailable("purge_older_than", "connection refused"))
    }

    async fn count_pending(&self, _: DateTime<Utc>, _: Duration) -> Result<u64, DomainError> {
        Err(DomainError::store_unavailable("count_pending", "connection refused"))
    }
}

/// Registry that cannot be written
#[derive(Default)]
pub struct ReadOnlyUserRepository {
    inner: MemoryUserRepository,
}

#[async_trait]
impl UserRepository for ReadOnlyUserRepository {
    async fn activate(&self, _: &str, _: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::store_unavailable("activate", "read-only replica"))
    }

    async fn register_pending(&self, _: &str, _: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::store_unavailable("register_pending", "read-only replica"))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        self.inner.find_by_phone(phone).await
    }

    async fn count_by_status(&self, status: UserStatus) -> Result<u64, DomainError> {
        self.inner.count_by_status(status).await
    }
}
