//! Notification route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gearshop_core::{NotificationId, messages};
use serde::Serialize;

use crate::db::RepositoryError;
use crate::db::notifications::NotificationRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireUser;
use crate::models::PageQuery;
use crate::models::notification::NotificationList;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

pub async fn list(
    State(state): State<AppState>,
    auth: RequireUser,
    Query(page_query): Query<PageQuery>,
) -> Result<Json<NotificationList>> {
    let (page, per_page) = page_query.clamped();
    let repo = NotificationRepository::new(state.pool());
    let data = repo.list(auth.user.id, page, per_page).await?;
    let unread_count = repo.unread_count(auth.user.id).await?;
    Ok(Json(NotificationList { data, unread_count }))
}

pub async fn unread_count(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<Json<UnreadCount>> {
    let unread_count = NotificationRepository::new(state.pool())
        .unread_count(auth.user.id)
        .await?;
    Ok(Json(UnreadCount { unread_count }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<NotificationId>,
) -> Result<StatusCode> {
    NotificationRepository::new(state.pool())
        .mark_read(auth.user.id, id)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => {
                AppError::not_found(messages::NOTIFICATION_NOT_FOUND)
            }
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<StatusCode> {
    NotificationRepository::new(state.pool())
        .mark_all_read(auth.user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
