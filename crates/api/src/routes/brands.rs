//! Brand route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use gearshop_core::{BrandId, messages};

use crate::db::RepositoryError;
use crate::db::brands::BrandRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{OptionalUser, RequireAdmin};
use crate::models::brand::{Brand, CreateBrandRequest, UpdateBrandRequest};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<Vec<Brand>>> {
    let include_inactive = user.is_some_and(|u| u.role.is_admin());
    let brands = BrandRepository::new(state.pool())
        .list(include_inactive)
        .await?;
    Ok(Json(brands))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<Json<Brand>> {
    let brand = BrandRepository::new(state.pool())
        .find(id)
        .await
        .map_err(not_found)?;
    Ok(Json(brand))
}

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<Brand>)> {
    if req.name.trim().is_empty() || req.slug.trim().is_empty() {
        return Err(AppError::bad_request(messages::VALIDATION));
    }
    let brand = BrandRepository::new(state.pool()).create(&req).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<BrandId>,
    Json(req): Json<UpdateBrandRequest>,
) -> Result<Json<Brand>> {
    let brand = BrandRepository::new(state.pool())
        .update(id, &req)
        .await
        .map_err(not_found)?;
    Ok(Json(brand))
}

pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<BrandId>,
) -> Result<StatusCode> {
    BrandRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the generic row-miss message with the brand-specific one.
fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::not_found(messages::BRAND_NOT_FOUND),
        other => other.into(),
    }
}
