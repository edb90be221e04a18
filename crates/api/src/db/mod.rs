//! Database access layer.
//!
//! Each submodule exposes a lightweight repository struct borrowing the
//! shared [`PgPool`]. Repositories translate rows into the domain types in
//! `crate::models` and map driver errors into [`RepositoryError`].

pub mod brands;
pub mod categories;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod statistics;
pub mod tokens;
pub mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data violated a domain invariant (e.g. an unknown status
    /// string). Indicates a bug or manual tampering, not client error.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The requested row does not exist.
    #[error("row not found")]
    NotFound,

    /// A unique constraint or similar conflict. Carries the
    /// client-facing Vietnamese message.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map `RowNotFound` to the dedicated variant so callers can turn it
    /// into a 404 without inspecting sqlx internals.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }

    /// Whether this is a unique violation on the named constraint.
    /// Order creation retries code collisions this way.
    #[must_use]
    pub fn is_unique_violation_on(&self, constraint: &str) -> bool {
        if let Self::Database(sqlx::Error::Database(db_err)) = self {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        } else {
            false
        }
    }

    /// Build a conflict if `err` is a unique violation on `constraint`,
    /// otherwise pass the error through.
    pub(crate) fn conflict_on_unique(
        err: sqlx::Error,
        constraint: &str,
        message: &str,
    ) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
            && db_err.constraint() == Some(constraint)
        {
            return Self::Conflict(message.to_string());
        }
        Self::Database(err)
    }
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;
    Ok(pool)
}
