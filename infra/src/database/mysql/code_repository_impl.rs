//! MySQL implementation of the CodeRepository trait.
//!
//! Rows live in `verification_codes`. The single-use guarantee rests on
//! `mark_used` being one conditional `UPDATE`: InnoDB row locking lets exactly
//! one of several concurrent statements see `used = FALSE` and change the row.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySqlPool, Row};
use tracing::{debug, error};

use vc_core::domain::entities::verification_code::{CodeId, VerificationCode};
use vc_core::errors::DomainError;
use vc_core::repositories::CodeRepository;
use vc_shared::utils::phone::mask_phone_number;

/// MySQL implementation of CodeRepository
#[derive(Clone)]
pub struct MySqlCodeRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlCodeRepository {
    /// Create a new MySQL code repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Map a driver error to the domain's store failure, logging it once
    fn store_error(operation: &'static str, e: sqlx::Error) -> DomainError {
        error!(
            operation = operation,
            error = %e,
            event = "store_unavailable",
            "Code store query failed"
        );
        DomainError::store_unavailable(operation, e)
    }

    /// Convert database row to VerificationCode entity
    fn row_to_code(row: &sqlx::mysql::MySqlRow) -> Result<VerificationCode, DomainError> {
        let column = |e: sqlx::Error| DomainError::Internal {
            message: format!("Malformed verification_codes row: {}", e),
        };

        Ok(VerificationCode {
            id: CodeId(row.try_get("id").map_err(column)?),
            phone: row.try_get("phone").map_err(column)?,
            code: row.try_get("code").map_err(column)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(column)?,
            used: row.try_get("used").map_err(column)?,
        })
    }
}

#[async_trait]
impl CodeRepository for MySqlCodeRepository {
    async fn insert(
        &self,
        phone: &str,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<CodeId, DomainError> {
        let query = r#"
            INSERT INTO verification_codes (phone, code, created_at, used)
            VALUES (?, ?, ?, FALSE)
        "#;

        let result = sqlx::query(query)
            .bind(phone)
            .bind(code)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::store_error("insert", e))?;

        let id = CodeId(result.last_insert_id() as i64);
        debug!(
            phone = %mask_phone_number(phone),
            code_id = %id,
            "Inserted verification code row"
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
        let query = r#"
            SELECT id, phone, code, created_at, used
            FROM verification_codes
            WHERE phone = ? AND code = ? AND used = FALSE AND created_at > ?
            ORDER BY created_at ASC, id ASC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(phone)
            .bind(code)
            .bind(now - ttl)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::store_error("find_valid", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_code(&row)?)),
            None => Ok(None),
        }
    }

    async fn mark_used(&self, id: CodeId) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE verification_codes
            SET used = TRUE
            WHERE id = ? AND used = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::store_error("mark_used", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn purge_older_than(&self, now: DateTime<Utc>, ttl: Duration) -> Result<u64, DomainError> {
        let query = r#"
            DELETE FROM verification_codes
            WHERE created_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(now - ttl)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::store_error("purge_older_than", e))?;

        Ok(result.rows_affected())
    }

    async fn count_pending(&self, now: DateTime<Utc>, ttl: Duration) -> Result<u64, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS pending
            FROM verification_codes
            WHERE used = FALSE AND created_at > ?
        "#;

        let row = sqlx::query(query)
            .bind(now - ttl)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::store_error("count_pending", e))?;

        let pending: i64 = row.try_get("pending").map_err(|e| DomainError::Internal {
            message: format!("Failed to read pending count: {}", e),
        })?;
        Ok(pending.max(0) as u64)
    }
}
