//! Auth-specific errors with their HTTP mapping.

use axum::http::StatusCode;
use gearshop_core::messages;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Email unknown or password wrong. Deliberately one variant so the
    /// response does not reveal which half failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has been deactivated by an admin.
    #[error("account locked")]
    AccountLocked,

    /// Email failed validation at registration.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] gearshop_core::EmailError),

    /// Password shorter than the minimum.
    #[error("password too short")]
    PasswordTooShort,

    /// Current password did not match on a password change.
    #[error("current password mismatch")]
    PasswordMismatch,

    /// No `Authorization: Bearer` header on a protected route.
    #[error("missing bearer token")]
    TokenMissing,

    /// The presented token is unknown or expired.
    #[error("invalid or expired token")]
    TokenInvalid,

    /// Authenticated, but the route needs the admin role.
    #[error("admin role required")]
    Forbidden,

    /// Password hashing backend failure.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl AuthError {
    pub(crate) const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::TokenMissing | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountLocked | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidEmail(_) | Self::PasswordTooShort | Self::PasswordMismatch => {
                StatusCode::BAD_REQUEST
            }
            Self::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountLocked => "account_locked",
            Self::InvalidEmail(_) | Self::PasswordTooShort | Self::PasswordMismatch => {
                "validation"
            }
            Self::TokenMissing | Self::TokenInvalid => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Hash(_) => "internal",
        }
    }

    pub(crate) const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => messages::INVALID_CREDENTIALS,
            Self::AccountLocked => messages::ACCOUNT_LOCKED,
            Self::InvalidEmail(_) => messages::EMAIL_INVALID,
            Self::PasswordTooShort => messages::PASSWORD_TOO_SHORT,
            Self::PasswordMismatch => messages::PASSWORD_MISMATCH,
            Self::TokenMissing => messages::LOGIN_REQUIRED,
            Self::TokenInvalid => messages::SESSION_EXPIRED,
            Self::Forbidden => messages::FORBIDDEN,
            Self::Hash(_) => messages::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_are_indistinguishable() {
        // Same status and message whether the email or the password was wrong.
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidCredentials.user_message(),
            messages::INVALID_CREDENTIALS
        );
    }

    #[test]
    fn locked_accounts_are_forbidden_not_unauthorized() {
        assert_eq!(AuthError::AccountLocked.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
