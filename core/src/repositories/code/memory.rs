//! In-memory implementation of CodeRepository
//!
//! Used by tests and by `STORE_BACKEND=memory` development runs. Every
//! mutation happens under one write lock, which gives `mark_used` the same
//! compare-and-set behaviour as the conditional UPDATE of the SQL store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::verification_code::{CodeId, VerificationCode};
use crate::errors::DomainError;

use super::trait_::CodeRepository;

#[derive(Default)]
struct CodeTable {
    next_id: i64,
    rows: BTreeMap<CodeId, VerificationCode>,
}

/// Process-local code store
#[derive(Clone, Default)]
pub struct MemoryCodeRepository {
    table: Arc<RwLock<CodeTable>>,
}

impl MemoryCodeRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a row by id regardless of its state
    pub async fn get(&self, id: CodeId) -> Option<VerificationCode> {
        self.table.read().await.rows.get(&id).cloned()
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no rows
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

#[async_trait]
impl CodeRepository for MemoryCodeRepository {
    async fn insert(
        &self,
        phone: &str,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<CodeId, DomainError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = CodeId(table.next_id);
        table.rows.insert(
            id,
            VerificationCode::new(id, phone.to_string(), code.to_string(), created_at),
        );
        Ok(id)
    }

    async fn find_valid(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|row| row.is_redeemable_by(phone, code, now, ttl))
            .min_by_key(|row| (row.created_at, row.id))
            .cloned())
    }

    async fn mark_used(&self, id: CodeId) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) if !row.used => {
                row.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_older_than(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, row| !row.is_expired_at(now, ttl));
        Ok((before - table.rows.len()) as u64)
    }

    async fn count_pending(&self, now: DateTime<Utc>, ttl: Duration) -> Result<u64, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|row| !row.used && !row.is_expired_at(now, ttl))
            .count() as u64)
    }
}
