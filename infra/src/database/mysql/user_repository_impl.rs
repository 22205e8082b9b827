//! MySQL implementation of the UserRepository trait.
//!
//! Users are keyed by the normalized phone number (`users.phone` is UNIQUE),
//! so both writes are single upsert statements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::{error, info};

use vc_core::domain::entities::user::{User, UserStatus};
use vc_core::errors::DomainError;
use vc_core::repositories::UserRepository;
use vc_shared::utils::phone::mask_phone_number;

/// MySQL implementation of UserRepository
#[derive(Clone)]
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn store_error(operation: &'static str, e: sqlx::Error) -> DomainError {
        error!(
            operation = operation,
            error = %e,
            event = "store_unavailable",
            "User registry query failed"
        );
        DomainError::store_unavailable(operation, e)
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let column = |e: sqlx::Error| DomainError::Internal {
            message: format!("Malformed users row: {}", e),
        };

        let status: String = row.try_get("status").map_err(column)?;
        let status = status
            .parse::<UserStatus>()
            .map_err(|e| DomainError::Internal { message: e })?;

        Ok(User {
            phone: row.try_get("phone").map_err(column)?,
            status,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(column)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(column)?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn activate(&self, phone: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO users (phone, status, created_at, updated_at)
            VALUES (?, 'active', ?, ?)
            ON DUPLICATE KEY UPDATE status = 'active', updated_at = VALUES(updated_at)
        "#;

        sqlx::query(query)
            .bind(phone)
            .bind(at)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::store_error("activate", e))?;

        info!(
            phone = %mask_phone_number(phone),
            event = "user_activated",
            "User marked active"
        );
        Ok(())
    }

    async fn register_pending(&self, phone: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        // Existing rows, active or pending, are left untouched
        let query = r#"
            INSERT INTO users (phone, status, created_at, updated_at)
            VALUES (?, 'pending', ?, ?)
            ON DUPLICATE KEY UPDATE phone = phone
        "#;

        sqlx::query(query)
            .bind(phone)
            .bind(at)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::store_error("register_pending", e))?;

        Ok(())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT phone, status, created_at, updated_at
            FROM users
            WHERE phone = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::store_error("find_by_phone", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn count_by_status(&self, status: UserStatus) -> Result<u64, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS total
            FROM users
            WHERE status = ?
        "#;

        let row = sqlx::query(query)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::store_error("count_by_status", e))?;

        let total: i64 = row.try_get("total").map_err(|e| DomainError::Internal {
            message: format!("Failed to read user count: {}", e),
        })?;
        Ok(total.max(0) as u64)
    }
}
