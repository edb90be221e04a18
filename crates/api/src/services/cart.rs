//! Cart revalidation.
//!
//! The storefront keeps the cart in the browser, so by checkout time
//! prices may have moved and stock may be gone. This service reconciles
//! the client's view with the catalog and tells it exactly what changed.

use std::collections::HashMap;

use gearshop_core::{ProductId, Vnd, messages};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::cart::{
    LineStatus, ValidateCartRequest, ValidateCartResponse, ValidatedLine,
};
use crate::state::AppState;

pub struct CartService<'a> {
    state: &'a AppState,
}

impl<'a> CartService<'a> {
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn validate(&self, req: &ValidateCartRequest) -> Result<ValidateCartResponse> {
        if req.items.iter().any(|line| line.quantity <= 0) {
            return Err(AppError::bad_request(messages::QUANTITY_INVALID));
        }

        let products = ProductRepository::new(self.state.pool());
        let mut items = Vec::with_capacity(req.items.len());
        let mut subtotal = Vnd::ZERO;
        let mut valid = true;
        // Lines repeating a product draw from the same stock pool.
        let mut claimed: HashMap<ProductId, i32> = HashMap::new();

        for line in &req.items {
            let Some(product) = products.find_opt(line.product_id).await? else {
                valid = false;
                items.push(ValidatedLine {
                    product_id: line.product_id,
                    name: String::new(),
                    status: LineStatus::Removed,
                    quantity: 0,
                    price: Vnd::ZERO,
                    message: Some(messages::PRODUCT_NOT_FOUND.to_string()),
                });
                continue;
            };

            if !product.is_active {
                valid = false;
                items.push(ValidatedLine {
                    product_id: product.id,
                    name: product.name,
                    status: LineStatus::Removed,
                    quantity: 0,
                    price: product.price,
                    message: Some(messages::PRODUCT_DISCONTINUED.to_string()),
                });
                continue;
            }
            let available = product.stock - claimed.get(&product.id).copied().unwrap_or(0);
            if available <= 0 {
                valid = false;
                items.push(ValidatedLine {
                    product_id: product.id,
                    name: product.name,
                    status: LineStatus::Removed,
                    quantity: 0,
                    price: product.price,
                    message: Some(messages::OUT_OF_STOCK.to_string()),
                });
                continue;
            }

            // Quantity first, then price: a clamped line keeps the current
            // price either way.
            let (status, quantity, message) = if line.quantity > available {
                (
                    LineStatus::QuantityReduced,
                    available,
                    Some(messages::INSUFFICIENT_STOCK.to_string()),
                )
            } else if line.price != product.price.as_i64() {
                (
                    LineStatus::PriceChanged,
                    line.quantity,
                    Some(messages::PRICE_CHANGED.to_string()),
                )
            } else {
                (LineStatus::Ok, line.quantity, None)
            };
            if status != LineStatus::Ok {
                valid = false;
            }

            let line_total = product
                .price
                .checked_mul(i64::from(quantity))
                .and_then(|t| subtotal.checked_add(t))
                .ok_or_else(|| AppError::Internal("cart subtotal overflow".to_string()))?;
            subtotal = line_total;
            *claimed.entry(product.id).or_insert(0) += quantity;

            items.push(ValidatedLine {
                product_id: product.id,
                name: product.name,
                status,
                quantity,
                price: product.price,
                message,
            });
        }

        Ok(ValidateCartResponse {
            items,
            valid,
            subtotal,
        })
    }
}
