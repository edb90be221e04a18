//! Admin account management commands.

use gearshop_core::{Email, UserRole};
use sqlx::PgPool;
use thiserror::Error;

use gearshop_api::services::auth::{self, MIN_PASSWORD_LEN};

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] gearshop_core::EmailError),

    /// Password shorter than the minimum.
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    /// Password hashing failure.
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Create an admin account, or promote and re-key an existing account
/// with the same email.
pub async fn create_admin(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let email = Email::parse(email)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AdminError::PasswordTooShort);
    }

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("GEARSHOP_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let password_hash =
        auth::hash_password(password).map_err(|e| AdminError::Hash(e.to_string()))?;

    tracing::info!("Creating admin account: {}", email);
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, full_name, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO UPDATE
         SET password_hash = EXCLUDED.password_hash,
             full_name = EXCLUDED.full_name,
             role = EXCLUDED.role,
             is_active = TRUE,
             updated_at = NOW()
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(name)
    .bind(UserRole::Admin.as_str())
    .fetch_one(&pool)
    .await?;

    tracing::info!("Admin account ready (id {id})");
    Ok(id)
}
