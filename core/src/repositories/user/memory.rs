//! In-memory implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{User, UserStatus};
use crate::errors::DomainError;

use super::trait_::UserRepository;

/// Process-local user registry
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserRepository {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn activate(&self, phone: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        users
            .entry(phone.to_string())
            .and_modify(|user| user.activate(at))
            .or_insert_with(|| User::new(phone.to_string(), UserStatus::Active, at));
        Ok(())
    }

    async fn register_pending(&self, phone: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        users
            .entry(phone.to_string())
            .or_insert_with(|| User::new(phone.to_string(), UserStatus::Pending, at));
        Ok(())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(phone).cloned())
    }

    async fn count_by_status(&self, status: UserStatus) -> Result<u64, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.status == status).count() as u64)
    }
}
