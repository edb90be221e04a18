//! Bearer-token extractors.
//!
//! Handlers declare their auth requirement through the argument list:
//! [`RequireUser`] for any logged-in account, [`RequireAdmin`] for the
//! back-office, [`OptionalUser`] where a guest and a customer get
//! different behavior (checkout attaches the order to the account).

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::db::tokens::TokenRepository;
use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::user::User;
use crate::services::auth::{AuthError, token_hash};
use crate::state::AppState;

/// A logged-in account. Keeps the raw bearer token so logout can revoke
/// exactly the session that made the request.
pub struct RequireUser {
    pub user: User,
    pub token: String,
}

/// A logged-in admin account.
pub struct RequireAdmin(pub User);

/// A logged-in account if a valid token was presented, `None` otherwise.
/// Invalid or expired tokens are still rejected: silently downgrading a
/// customer to a guest would detach their order history.
pub struct OptionalUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::TokenInvalid)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::TokenInvalid)?;
    Ok(Some(token))
}

async fn authenticate(state: &AppState, token: &str) -> Result<User, AppError> {
    let owner = TokenRepository::new(state.pool())
        .resolve(&token_hash(token))
        .await?
        .ok_or(AuthError::TokenInvalid)?;
    if !owner.is_active {
        return Err(AuthError::AccountLocked.into());
    }
    let user = UserRepository::new(state.pool())
        .find_by_id(owner.user_id)
        .await?;
    Ok(user)
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or(AuthError::TokenMissing)?
            .to_string();
        let user = authenticate(state, &token).await?;
        Ok(Self { user, token })
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser { user, .. } = RequireUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AuthError::Forbidden.into());
        }
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(Self(None)),
            Some(token) => {
                let user = authenticate(state, token).await?;
                Ok(Self(Some(user)))
            }
        }
    }
}
