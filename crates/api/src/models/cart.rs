//! Cart validation.
//!
//! The cart itself lives in the browser; the server only revalidates it
//! against current prices and stock before checkout.

use gearshop_core::{ProductId, Vnd};
use serde::{Deserialize, Serialize};

/// One line the client believes is in its cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price the client last saw; used to flag price drift.
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct ValidateCartRequest {
    pub items: Vec<CartLine>,
}

/// What happened to a line during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    /// Unchanged and purchasable as-is.
    Ok,
    /// Unit price differs from what the client sent.
    PriceChanged,
    /// Requested quantity exceeds stock; `quantity` was clamped.
    QuantityReduced,
    /// Product is inactive, deleted, or out of stock; line must go.
    Removed,
}

/// One validated line in the response.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedLine {
    pub product_id: ProductId,
    pub name: String,
    pub status: LineStatus,
    pub quantity: i32,
    pub price: Vnd,
    /// Vietnamese note for lines that changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateCartResponse {
    pub items: Vec<ValidatedLine>,
    /// True when every line came back [`LineStatus::Ok`].
    pub valid: bool,
    pub subtotal: Vnd,
}
