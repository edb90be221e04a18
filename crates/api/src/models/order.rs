//! Orders and their line items.

use chrono::{DateTime, Utc};
use gearshop_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId, Vnd};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub code: String,
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: String,
    pub note: Option<String>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub subtotal: Vnd,
    pub shipping_fee: Vnd,
    pub total: Vnd,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name and unit price are captured at purchase time, so this stays
/// accurate even after catalog edits.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Vnd,
    pub quantity: i32,
    pub line_total: Vnd,
}

/// One entry in the status timeline.
#[derive(Debug, Clone, Serialize)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full order view with items and timeline.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub history: Vec<StatusHistoryEntry>,
}

/// One line in a checkout payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Checkout payload (`POST /api/orders`). Works for guests and for
/// logged-in users alike; the authenticated user, if any, is attached
/// server-side.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: String,
    pub note: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub items: Vec<CheckoutItem>,
}

/// Admin status transition payload.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub note: Option<String>,
}

/// Admin payment status payload.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// Admin listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Substring match on code, customer name, or phone.
    pub q: Option<String>,
    /// Inclusive creation-date range.
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}
