//! Per-user notifications polled by the storefront.

use chrono::{DateTime, Utc};
use gearshop_core::{NotificationId, OrderId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub order_id: Option<OrderId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/notifications` response: latest page plus the unread count
/// so the bell badge needs no second request.
#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub data: Vec<Notification>,
    pub unread_count: i64,
}
