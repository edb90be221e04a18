//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gearshop_core::{ProductId, ProductImageId, messages, pcbuild::ComponentKind};
use serde::Deserialize;

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{OptionalUser, RequireAdmin};
use crate::models::{
    Paginated, Pagination,
    product::{
        CreateProductRequest, ImageInput, Product, ProductDetail, ProductFilter, ProductImage,
        ProductSort, Specification, SpecificationInput, UpdateProductRequest,
    },
};
use crate::state::AppState;

const RELATED_LIMIT: i64 = 8;

/// Listing query. Kept flat: `serde_urlencoded` does not handle
/// `#[serde(flatten)]` for non-string fields.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub category_id: Option<gearshop_core::CategoryId>,
    pub brand_id: Option<gearshop_core::BrandId>,
    pub component_kind: Option<ComponentKind>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock: Option<bool>,
    pub sort: Option<ProductSort>,
}

pub async fn list(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<Product>>> {
    let (page, per_page) = crate::models::PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .clamped();

    let filter = ProductFilter {
        q: query.q,
        category_id: query.category_id,
        brand_id: query.brand_id,
        component_kind: query.component_kind,
        min_price: query.min_price,
        max_price: query.max_price,
        in_stock: query.in_stock,
        sort: query.sort,
    };

    // A category filter includes products filed under its descendants.
    let category_ids = match filter.category_id {
        Some(id) => CategoryRepository::new(state.pool()).subtree_ids(id).await?,
        None => Vec::new(),
    };

    let storefront = !user.is_some_and(|u| u.role.is_admin());
    let (products, total) = ProductRepository::new(state.pool())
        .list(&filter, &category_ids, storefront, page, per_page)
        .await?;
    Ok(Json(Paginated::new(
        products,
        Pagination::new(page, per_page, total),
    )))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let detail = ProductRepository::new(state.pool()).find_detail(id).await?;
    Ok(Json(detail))
}

pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.pool());
    // 404 for unknown products rather than an empty list.
    repo.find(id).await?;
    let products = repo.related(id, RELATED_LIMIT).await?;
    Ok(Json(products))
}

fn check_prices(price: i64, original_price: Option<i64>) -> Result<()> {
    if price <= 0 || original_price.is_some_and(|p| p <= 0) {
        return Err(AppError::bad_request(messages::PRICE_NOT_POSITIVE));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDetail>)> {
    check_prices(req.price, req.original_price)?;
    if req.stock < 0 {
        return Err(AppError::bad_request(messages::QUANTITY_INVALID));
    }

    let detail = ProductRepository::new(state.pool()).create(&req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductDetail>> {
    if let Some(price) = req.price {
        check_prices(price, None)?;
    }
    if let Some(Some(original)) = req.original_price {
        check_prices(original, None)?;
    }
    if req.stock.is_some_and(|s| s < 0) {
        return Err(AppError::bad_request(messages::QUANTITY_INVALID));
    }

    let detail = ProductRepository::new(state.pool()).update(id, &req).await?;
    Ok(Json(detail))
}

pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(req): Json<ImageInput>,
) -> Result<(StatusCode, Json<ProductImage>)> {
    if req.url.trim().is_empty() {
        return Err(AppError::bad_request(messages::VALIDATION));
    }
    let image = ProductRepository::new(state.pool()).add_image(id, &req).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn remove_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, image_id)): Path<(ProductId, ProductImageId)>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete_image(id, image_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn replace_specifications(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(specs): Json<Vec<SpecificationInput>>,
) -> Result<Json<Vec<Specification>>> {
    if specs.iter().any(|s| s.name.trim().is_empty()) {
        return Err(AppError::bad_request(messages::VALIDATION));
    }
    let specs = ProductRepository::new(state.pool())
        .replace_specification_set(id, &specs)
        .await?;
    Ok(Json(specs))
}
