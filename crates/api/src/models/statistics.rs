//! Admin dashboard statistics.

use gearshop_core::{OrderStatus, ProductId, Vnd};
use serde::Serialize;

use super::order::Order;

/// Top-level dashboard payload (`GET /api/admin/statistics`).
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub totals: Totals,
    pub orders_by_status: Vec<StatusCount>,
    pub revenue_by_day: Vec<DailyRevenue>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<Order>,
    pub low_stock: Vec<LowStockProduct>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Totals {
    /// Revenue counts delivered orders only.
    pub revenue: Vnd,
    pub orders: i64,
    /// Accounts registered inside the requested range.
    pub new_users: i64,
    pub products: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyRevenue {
    /// Calendar day, `YYYY-MM-DD`.
    pub day: String,
    pub revenue: Vnd,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub units_sold: i64,
    pub revenue: Vnd,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowStockProduct {
    pub product_id: ProductId,
    pub name: String,
    pub product_code: String,
    pub stock: i32,
}
