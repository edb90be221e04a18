//! Registration, login, and token management.
//!
//! Passwords are hashed with argon2id. Session tokens are 32 random bytes
//! issued to the client as base64url; the server keeps only their SHA-256
//! hex digest, so a database leak does not expose usable tokens.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use gearshop_core::{Email, UserId};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::db::tokens::TokenRepository;
use crate::db::users::UserRepository;
use crate::error::Result;
use crate::models::user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User,
};
use crate::state::AppState;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Register a new customer account and log it in.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        let email = Email::parse(&req.email).map_err(AuthError::InvalidEmail)?;
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort.into());
        }

        let password_hash = hash_password(&req.password)?;
        let user = UserRepository::new(self.state.pool())
            .create(
                email.as_str(),
                &password_hash,
                req.full_name.trim(),
                req.phone.as_deref(),
            )
            .await?;

        let token = self.issue_token(user.id).await?;
        Ok(AuthResponse { token, user })
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let users = UserRepository::new(self.state.pool());
        let record = users
            .find_by_email(req.email.trim().to_lowercase().as_str())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&req.password, &record.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }
        if !record.is_active {
            return Err(AuthError::AccountLocked.into());
        }

        let user: User = record.try_into()?;
        let token = self.issue_token(user.id).await?;

        // Cheap opportunistic cleanup while we are here.
        let purged = TokenRepository::new(self.state.pool()).purge_expired().await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired auth tokens");
        }

        Ok(AuthResponse { token, user })
    }

    /// Revoke the presented token.
    pub async fn logout(&self, token: &str) -> Result<()> {
        TokenRepository::new(self.state.pool())
            .delete(&token_hash(token))
            .await?;
        Ok(())
    }

    /// Change the password and revoke every session.
    pub async fn change_password(
        &self,
        user_id: UserId,
        req: &ChangePasswordRequest,
    ) -> Result<()> {
        let users = UserRepository::new(self.state.pool());
        let current_hash = users.password_hash(user_id).await?;
        if !verify_password(&req.current_password, &current_hash)? {
            return Err(AuthError::PasswordMismatch.into());
        }
        if req.new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort.into());
        }

        users
            .update_password(user_id, &hash_password(&req.new_password)?)
            .await?;
        TokenRepository::new(self.state.pool())
            .delete_for_user(user_id)
            .await?;
        Ok(())
    }

    async fn issue_token(&self, user_id: UserId) -> Result<String> {
        let token = generate_token();
        TokenRepository::new(self.state.pool())
            .insert(user_id, &token_hash(&token), self.state.config().token_ttl_days)
            .await?;
        Ok(token)
    }
}

/// Hash a password with argon2id and a fresh salt.
pub fn hash_password(password: &str) -> std::result::Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, hash: &str) -> std::result::Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A fresh opaque token: 32 random bytes, base64url without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hex digest of a token, the only form ever stored.
pub fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("mật khẩu bí mật").unwrap();
        assert!(verify_password("mật khẩu bí mật", &hash).unwrap());
        assert!(!verify_password("sai mật khẩu", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn token_hash_is_stable_hex() {
        let token = "abc123";
        assert_eq!(token_hash(token), token_hash(token));
        assert_eq!(token_hash(token).len(), 64);
        assert_ne!(token_hash(token), token_hash("abc124"));
    }
}
