//! Bearer token repository.
//!
//! Tokens are opaque random strings; only their SHA-256 hex digest is
//! stored, so a leaked database dump cannot be replayed against the API.

use chrono::{DateTime, Duration, Utc};
use gearshop_core::UserId;
use sqlx::PgPool;

use super::Result;

/// The account a valid token resolves to. `is_active` is carried so the
/// caller can answer a locked account with 403 instead of 401.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct TokenOwner {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a freshly issued token hash.
    pub async fn insert(
        &self,
        user_id: UserId,
        token_hash: &str,
        ttl_days: i64,
    ) -> Result<()> {
        let expires_at = Utc::now() + Duration::days(ttl_days);
        sqlx::query(
            "INSERT INTO auth_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Resolve a token hash to its owner if the token is still valid,
    /// touching `last_used_at` as a side effect. Expired rows are not
    /// matched; cleanup happens lazily via [`Self::purge_expired`].
    pub async fn resolve(&self, token_hash: &str) -> Result<Option<TokenOwner>> {
        let owner = sqlx::query_as::<_, TokenOwner>(
            "UPDATE auth_tokens t
             SET last_used_at = NOW()
             FROM users u
             WHERE t.token_hash = $1
               AND t.expires_at > NOW()
               AND u.id = t.user_id
             RETURNING t.user_id, t.expires_at, u.is_active",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;
        Ok(owner)
    }

    /// Delete one token (logout).
    pub async fn delete(&self, token_hash: &str) -> Result<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Delete every token a user holds (password change, account lock).
    pub async fn delete_for_user(&self, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Remove expired rows. Called opportunistically from the auth service.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= NOW()")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
