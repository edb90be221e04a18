//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gearshop_core::{OrderId, messages};
use rand::Rng;

use crate::db::orders::{OrderRepository, StatusUpdate};
use crate::error::{AppError, Result};
use crate::middleware::auth::{OptionalUser, RequireAdmin, RequireUser};
use crate::models::{
    PageQuery, Paginated, Pagination,
    order::{
        CheckoutRequest, Order, OrderDetail, UpdateOrderStatusRequest,
        UpdatePaymentStatusRequest,
    },
};
use crate::state::AppState;

/// Unambiguous alphabet for tracking codes (no 0/O, 1/I/L).
const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";
const CODE_LEN: usize = 8;
const CODE_RETRIES: u32 = 5;

/// A fresh human-facing tracking code, e.g. `GS-7K2M9QX4`.
fn generate_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            char::from(CODE_ALPHABET[idx])
        })
        .collect();
    format!("GS-{suffix}")
}

pub async fn checkout(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    OrderRepository::validate_checkout(&req).map_err(AppError::bad_request)?;

    let repo = OrderRepository::new(state.pool());
    let user_id = user.map(|u| u.id);
    let shipping_fee = state.config().shipping_fee;

    // Code collisions are vanishingly rare but cheap to retry.
    let mut created = None;
    for attempt in 1..=CODE_RETRIES {
        match repo.create(&generate_code(), user_id, &req, shipping_fee).await {
            Ok(detail) => {
                created = Some(detail);
                break;
            }
            Err(err) if err.is_unique_violation_on("orders_code_key") => {
                tracing::warn!(attempt, "Order code collision, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }
    let Some(detail) = created else {
        return Err(AppError::Internal(format!(
            "order code generation collided {CODE_RETRIES} times"
        )));
    };

    tracing::info!(order = %detail.order.code, total = %detail.order.total, "Order placed");
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn list_own(
    State(state): State<AppState>,
    auth: RequireUser,
    Query(page_query): Query<PageQuery>,
) -> Result<Json<Paginated<Order>>> {
    let (page, per_page) = page_query.clamped();
    let (orders, total) = OrderRepository::new(state.pool())
        .list_for_user(auth.user.id, page, per_page)
        .await?;
    Ok(Json(Paginated::new(
        orders,
        Pagination::new(page, per_page, total),
    )))
}

pub async fn detail(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let detail = OrderRepository::new(state.pool())
        .find_detail(id)
        .await
        .map_err(not_found)?;

    // Owners and admins only; everyone else gets the same 404 as a
    // nonexistent order so IDs cannot be probed.
    let is_owner = detail.order.user_id == Some(auth.user.id);
    if !is_owner && !auth.user.role.is_admin() {
        return Err(AppError::not_found(messages::ORDER_NOT_FOUND));
    }
    Ok(Json(detail))
}

pub async fn track(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<OrderDetail>> {
    let detail = OrderRepository::new(state.pool())
        .find_by_code(code.trim())
        .await
        .map_err(not_found)?;
    Ok(Json(detail))
}

pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderDetail>> {
    let outcome = OrderRepository::new(state.pool())
        .update_status(id, req.status, req.note.as_deref())
        .await
        .map_err(not_found)?;

    match outcome {
        StatusUpdate::Updated(detail) => {
            tracing::info!(order = %detail.order.code, status = %detail.order.status, "Order status updated");
            Ok(Json(detail))
        }
        StatusUpdate::Invalid(current) => {
            tracing::debug!(%current, requested = %req.status, "Rejected status transition");
            Err(AppError::unprocessable(messages::ORDER_STATUS_INVALID))
        }
    }
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<OrderDetail>> {
    let detail = OrderRepository::new(state.pool())
        .update_payment_status(id, req.payment_status)
        .await
        .map_err(not_found)?;
    Ok(Json(detail))
}

fn not_found(err: crate::db::RepositoryError) -> AppError {
    match err {
        crate::db::RepositoryError::NotFound => AppError::not_found(messages::ORDER_NOT_FOUND),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_codes_stick_to_the_alphabet() {
        for _ in 0..32 {
            let code = generate_code();
            let suffix = code.strip_prefix("GS-").expect("missing GS- prefix");
            assert_eq!(suffix.len(), CODE_LEN);
            assert!(suffix.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }
}
