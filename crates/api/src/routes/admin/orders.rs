//! Admin order listing.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use gearshop_core::OrderStatus;
use serde::Deserialize;

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::models::{
    PageQuery, Paginated, Pagination,
    order::{Order, OrderFilter},
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    pub q: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<Order>>> {
    let (page, per_page) = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .clamped();
    let filter = OrderFilter {
        status: query.status,
        q: query.q,
        from: query.from,
        to: query.to,
    };

    let (orders, total) = OrderRepository::new(state.pool())
        .list_admin(&filter, page, per_page)
        .await?;
    Ok(Json(Paginated::new(
        orders,
        Pagination::new(page, per_page, total),
    )))
}
