//! Admin user management.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use gearshop_core::{UserId, messages};
use serde::Deserialize;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::{
    PageQuery, Paginated, Pagination,
    user::{SetUserActiveRequest, User},
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<User>>> {
    let (page, per_page) = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .clamped();

    let (users, total) = UserRepository::new(state.pool())
        .list(query.q.as_deref(), page, per_page)
        .await?;
    Ok(Json(Paginated::new(
        users,
        Pagination::new(page, per_page, total),
    )))
}

pub async fn set_active(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(req): Json<SetUserActiveRequest>,
) -> Result<Json<User>> {
    // Admins cannot lock themselves out.
    if admin.id == id && !req.is_active {
        return Err(AppError::bad_request(messages::VALIDATION));
    }

    let user = UserRepository::new(state.pool())
        .set_active(id, req.is_active)
        .await?;
    tracing::info!(user_id = %user.id, is_active = user.is_active, "Account active flag changed");
    Ok(Json(user))
}
