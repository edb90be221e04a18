//! Category route handlers.
//!
//! The storefront requests the tree on every page load, so the assembled
//! tree is cached in `AppState` and dropped on any mutation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use gearshop_core::{CategoryId, messages};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::category::{
    Category, CategoryNode, CategoryWithContext, CreateCategoryRequest, UpdateCategoryRequest,
    build_tree,
};
use crate::state::AppState;

pub async fn tree(State(state): State<AppState>) -> Result<Json<Arc<Vec<CategoryNode>>>> {
    if let Some(cached) = state.cached_category_tree().await {
        return Ok(Json(cached));
    }

    let flat = CategoryRepository::new(state.pool()).list(false).await?;
    let tree = Arc::new(build_tree(flat));
    state.store_category_tree(Arc::clone(&tree)).await;
    Ok(Json(tree))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryWithContext>> {
    let repo = CategoryRepository::new(state.pool());
    let category = repo.find(id).await.map_err(not_found)?;

    let flat = repo.list(false).await?;
    let children: Vec<Category> = flat
        .iter()
        .filter(|c| c.parent_id == Some(id))
        .cloned()
        .collect();

    // Root-first breadcrumb ending at the category itself.
    let ancestors = repo.ancestor_ids(id).await?;
    let mut breadcrumb: Vec<Category> = ancestors
        .into_iter()
        .filter_map(|aid| flat.iter().find(|c| c.id == aid).cloned())
        .collect();
    breadcrumb.reverse();
    if breadcrumb.last().map(|c| c.id) != Some(id) {
        breadcrumb.push(category.clone());
    }

    Ok(Json(CategoryWithContext {
        category,
        children,
        breadcrumb,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    if req.name.trim().is_empty() || req.slug.trim().is_empty() {
        return Err(AppError::bad_request(messages::VALIDATION));
    }
    let repo = CategoryRepository::new(state.pool());
    if let Some(parent_id) = req.parent_id
        && !repo.exists(parent_id).await?
    {
        return Err(AppError::bad_request(messages::CATEGORY_PARENT_INVALID));
    }

    let category = repo.create(&req).await?;
    state.invalidate_category_tree().await;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>> {
    let repo = CategoryRepository::new(state.pool());

    if let Some(Some(parent_id)) = req.parent_id {
        if parent_id == id || !repo.exists(parent_id).await? {
            return Err(AppError::bad_request(messages::CATEGORY_PARENT_INVALID));
        }
        // Re-parenting under one's own descendant would create a cycle.
        let ancestors = repo.ancestor_ids(parent_id).await?;
        if ancestors.contains(&id) {
            return Err(AppError::bad_request(messages::CATEGORY_PARENT_INVALID));
        }
    }

    let category = repo.update(id, &req).await.map_err(not_found)?;
    state.invalidate_category_tree().await;
    Ok(Json(category))
}

pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;
    state.invalidate_category_tree().await;
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::not_found(messages::CATEGORY_NOT_FOUND),
        other => other.into(),
    }
}
