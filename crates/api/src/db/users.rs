//! User account repository.

use chrono::{DateTime, Utc};
use gearshop_core::{UserId, UserRole, messages};
use sqlx::PgPool;

use super::{RepositoryError, Result};
use crate::models::user::User;

/// A user row including the password hash. Only the auth service sees
/// this; everything client-facing goes through [`User`].
#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRecord) -> Result<User> {
        let role: UserRole = row
            .role
            .parse()
            .map_err(RepositoryError::DataCorruption)?;
        Ok(User {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            address: row.address,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str =
    "id, email, password_hash, full_name, phone, address, role, is_active, created_at";

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when the email is already registered.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (email, password_hash, full_name, phone)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::conflict_on_unique(e, "users_email_key", messages::EMAIL_TAKEN)
        })?;
        row.try_into()
    }

    /// Look up a user by email, password hash included.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<User> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        row.try_into()
    }

    /// Current password hash, for verifying a password change.
    pub async fn password_hash(&self, id: UserId) -> Result<String> {
        let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)?;
        Ok(hash)
    }

    pub async fn update_profile(
        &self,
        id: UserId,
        full_name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(full_name)
        .bind(phone)
        .bind(address)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        row.try_into()
    }

    pub async fn update_password(&self, id: UserId, password_hash: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Admin listing, newest first, with optional email/name search.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<User>, i64)> {
        let pattern = search
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{q}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
             WHERE $1::text IS NULL OR email ILIKE $1 OR full_name ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users
             WHERE $1::text IS NULL OR email ILIKE $1 OR full_name ILIKE $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((users, total))
    }

    /// Lock or unlock an account. Revokes all tokens when locking.
    pub async fn set_active(&self, id: UserId, is_active: bool) -> Result<User> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET is_active = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(is_active)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        if !is_active {
            sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;
        }
        row.try_into()
    }
}
