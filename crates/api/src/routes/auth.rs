//! Account route handlers.

use axum::{Json, extract::State, http::StatusCode};

use crate::db::users::UserRepository;
use crate::error::Result;
use crate::middleware::auth::RequireUser;
use crate::models::user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
    User,
};
use crate::services::auth::AuthService;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = AuthService::new(&state).register(&req).await?;
    tracing::info!(user_id = %response.user.id, "Account registered");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let response = AuthService::new(&state).login(&req).await?;
    Ok(Json(response))
}

pub async fn logout(State(state): State<AppState>, auth: RequireUser) -> Result<StatusCode> {
    AuthService::new(&state).logout(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(auth: RequireUser) -> Json<User> {
    Json(auth.user)
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .update_profile(
            auth.user.id,
            req.full_name.as_deref().map(str::trim),
            req.phone.as_deref(),
            req.address.as_deref(),
        )
        .await?;
    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode> {
    AuthService::new(&state)
        .change_password(auth.user.id, &req)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
