//! Order repository.
//!
//! Checkout and status updates are multi-row writes and run inside a
//! transaction. Stock is the shared resource: product rows are locked
//! with `FOR UPDATE` before quantities are checked and adjusted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use gearshop_core::{
    OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId, Vnd, messages,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{RepositoryError, Result};
use crate::models::order::{
    CheckoutItem, CheckoutRequest, Order, OrderDetail, OrderFilter, OrderItem,
    StatusHistoryEntry,
};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    code: String,
    user_id: Option<UserId>,
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    shipping_address: String,
    note: Option<String>,
    status: String,
    payment_method: String,
    payment_status: String,
    subtotal: Vnd,
    shipping_fee: Vnd,
    total: Vnd,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Order> {
        Ok(Order {
            id: row.id,
            code: row.code,
            user_id: row.user_id,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            shipping_address: row.shipping_address,
            note: row.note,
            status: parse(&row.status)?,
            payment_method: parse(&row.payment_method)?,
            payment_status: parse(&row.payment_status)?,
            subtotal: row.subtotal,
            shipping_fee: row.shipping_fee,
            total: row.total,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse<T>(s: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    s.parse().map_err(RepositoryError::DataCorruption)
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: OrderItemId,
    product_id: ProductId,
    product_name: String,
    unit_price: Vnd,
    quantity: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    status: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

/// Product fields needed to price and stock-check one checkout line.
#[derive(Debug, sqlx::FromRow)]
struct LockedProduct {
    id: ProductId,
    name: String,
    price: Vnd,
    stock: i32,
    is_active: bool,
}

/// Result of a status update attempt.
#[derive(Debug)]
pub enum StatusUpdate {
    Updated(OrderDetail),
    /// The lifecycle does not allow this move; carries the current status.
    Invalid(OrderStatus),
}

const COLUMNS: &str = "id, code, user_id, customer_name, customer_phone, customer_email,
    shipping_address, note, status, payment_method, payment_status,
    subtotal, shipping_fee, total, created_at, updated_at";

pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order.
    ///
    /// Locks the referenced product rows, verifies stock and availability,
    /// captures current unit prices, computes totals server-side, and
    /// adjusts `stock`/`sold` in the same transaction.
    ///
    /// # Errors
    ///
    /// `Conflict` when a product is unavailable or stock is insufficient;
    /// the caller retries on a `code` collision (unique violation).
    pub async fn create(
        &self,
        code: &str,
        user_id: Option<UserId>,
        req: &CheckoutRequest,
        shipping_fee: Vnd,
    ) -> Result<OrderDetail> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<i32> = req.items.iter().map(|i| i.product_id.as_i32()).collect();
        let locked = sqlx::query_as::<_, LockedProduct>(
            "SELECT id, name, price, stock, is_active
             FROM products
             WHERE id = ANY($1) AND deleted_at IS NULL
             ORDER BY id
             FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;
        let by_id: HashMap<ProductId, &LockedProduct> =
            locked.iter().map(|p| (p.id, p)).collect();

        let wanted = Self::aggregate_items(&req.items)?;

        let mut subtotal = Vnd::ZERO;
        let mut lines = Vec::with_capacity(wanted.len());
        for (product_id, quantity) in &wanted {
            let Some(product) = by_id.get(product_id) else {
                return Err(RepositoryError::Conflict(
                    messages::PRODUCT_NOT_FOUND.to_string(),
                ));
            };
            if !product.is_active {
                return Err(RepositoryError::Conflict(
                    messages::PRODUCT_DISCONTINUED.to_string(),
                ));
            }
            if *quantity > product.stock {
                let message = if product.stock == 0 {
                    messages::OUT_OF_STOCK
                } else {
                    messages::INSUFFICIENT_STOCK
                };
                return Err(RepositoryError::Conflict(format!(
                    "{}: {}",
                    message, product.name
                )));
            }

            let line_total = product
                .price
                .checked_mul(i64::from(*quantity))
                .and_then(|t| subtotal.checked_add(t))
                .ok_or_else(|| {
                    RepositoryError::DataCorruption("order total overflow".to_string())
                })?;
            subtotal = line_total;
            lines.push((product.id, product.name.clone(), product.price, *quantity));
        }
        let total = subtotal
            .checked_add(shipping_fee)
            .ok_or_else(|| RepositoryError::DataCorruption("order total overflow".to_string()))?;

        let order_id: OrderId = sqlx::query_scalar(
            "INSERT INTO orders
                (code, user_id, customer_name, customer_phone, customer_email,
                 shipping_address, note, payment_method, subtotal, shipping_fee, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(code)
        .bind(user_id)
        .bind(&req.customer_name)
        .bind(&req.customer_phone)
        .bind(&req.customer_email)
        .bind(&req.shipping_address)
        .bind(&req.note)
        .bind(req.payment_method.as_str())
        .bind(subtotal)
        .bind(shipping_fee)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for (product_id, name, unit_price, quantity) in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(name)
            .bind(unit_price)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE products SET stock = stock - $2, sold = sold + $2, updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("INSERT INTO order_status_history (order_id, status) VALUES ($1, $2)")
            .bind(order_id)
            .bind(OrderStatus::Pending.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.find_detail(order_id).await
    }

    pub async fn find_detail(&self, id: OrderId) -> Result<OrderDetail> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        self.attach_detail(row).await
    }

    /// Public tracking lookup by human-facing code.
    pub async fn find_by_code(&self, code: &str) -> Result<OrderDetail> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE code = $1"
        ))
        .bind(code)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        self.attach_detail(row).await
    }

    async fn attach_detail(&self, row: OrderRow) -> Result<OrderDetail> {
        let order: Order = row.try_into()?;

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT id, product_id, product_name, unit_price, quantity
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;
        let items = items
            .into_iter()
            .map(|r| {
                let line_total = r
                    .unit_price
                    .checked_mul(i64::from(r.quantity))
                    .ok_or_else(|| {
                        RepositoryError::DataCorruption("line total overflow".to_string())
                    })?;
                Ok(OrderItem {
                    id: r.id,
                    product_id: r.product_id,
                    product_name: r.product_name,
                    unit_price: r.unit_price,
                    quantity: r.quantity,
                    line_total,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let history = sqlx::query_as::<_, HistoryRow>(
            "SELECT status, note, created_at
             FROM order_status_history WHERE order_id = $1 ORDER BY created_at, id",
        )
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;
        let history = history
            .into_iter()
            .map(|r| {
                Ok(StatusHistoryEntry {
                    status: parse(&r.status)?,
                    note: r.note,
                    created_at: r.created_at,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(OrderDetail {
            order,
            items,
            history,
        })
    }

    /// A customer's own orders, newest first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Order>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(self.pool)
        .await?;
        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((orders, total))
    }

    /// Admin listing with status, search, and date filters.
    pub async fn list_admin(
        &self,
        filter: &OrderFilter,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Order>, i64)> {
        fn push_conditions<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q OrderFilter) {
            qb.push(" WHERE TRUE");
            if let Some(status) = filter.status {
                qb.push(" AND status = ").push_bind(status.as_str());
            }
            if let Some(q) = filter.q.as_deref().filter(|q| !q.trim().is_empty()) {
                let pattern = format!("%{}%", q.trim());
                qb.push(" AND (code ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR customer_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR customer_phone ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            if let Some(from) = filter.from {
                qb.push(" AND created_at >= ").push_bind(from);
            }
            if let Some(to) = filter.to {
                // Inclusive end date.
                qb.push(" AND created_at < ").push_bind(to);
                qb.push(" + INTERVAL '1 day'");
            }
        }

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM orders");
        push_conditions(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM orders"));
        push_conditions(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind((page - 1) * per_page);

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(self.pool).await?;
        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((orders, total))
    }

    /// Move an order to `next` if the lifecycle allows it.
    ///
    /// Writes the history row and, for orders placed by an account, a
    /// notification in the same transaction. Cancelling returns the
    /// reserved stock.
    pub async fn update_status(
        &self,
        id: OrderId,
        next: OrderStatus,
        note: Option<&str>,
    ) -> Result<StatusUpdate> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String, Option<UserId>, String)> = sqlx::query_as(
            "SELECT status, user_id, code FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current, user_id, code)) = row else {
            return Err(RepositoryError::NotFound);
        };
        let current: OrderStatus = parse(&current)?;

        if !current.can_transition_to(next) {
            return Ok(StatusUpdate::Invalid(current));
        }

        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(next.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO order_status_history (order_id, status, note) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(next.as_str())
        .bind(note)
        .execute(&mut *tx)
        .await?;

        if next == OrderStatus::Cancelled {
            // Return the reserved stock.
            sqlx::query(
                "UPDATE products p
                 SET stock = p.stock + oi.quantity,
                     sold = p.sold - oi.quantity,
                     updated_at = NOW()
                 FROM order_items oi
                 WHERE oi.order_id = $1 AND p.id = oi.product_id",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(user_id) = user_id {
            sqlx::query(
                "INSERT INTO notifications (user_id, title, body, kind, order_id)
                 VALUES ($1, $2, $3, 'order', $4)",
            )
            .bind(user_id)
            .bind(format!("Đơn hàng {code}"))
            .bind(format!(
                "Đơn hàng {code} của bạn đã chuyển sang trạng thái: {}",
                next.label_vi()
            ))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(StatusUpdate::Updated(self.find_detail(id).await?))
    }

    pub async fn update_payment_status(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<OrderDetail> {
        let result = sqlx::query(
            "UPDATE orders SET payment_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(payment_status.as_str())
        .execute(self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.find_detail(id).await
    }

    /// Total requested quantity per product, in first-seen order.
    ///
    /// A payload may list the same product on several lines; they draw from
    /// the same stock, so the check and the stock adjustment both work on
    /// the summed quantity.
    fn aggregate_items(items: &[CheckoutItem]) -> Result<Vec<(ProductId, i32)>> {
        let mut wanted: Vec<(ProductId, i32)> = Vec::with_capacity(items.len());
        for item in items {
            match wanted.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, quantity)) => {
                    *quantity = quantity.checked_add(item.quantity).ok_or_else(|| {
                        RepositoryError::Conflict(messages::QUANTITY_INVALID.to_string())
                    })?;
                }
                None => wanted.push((item.product_id, item.quantity)),
            }
        }
        Ok(wanted)
    }

    /// Checkout request sanity: quantities, contact fields, payment method
    /// are deserialized upstream; only the structural checks live here.
    pub fn validate_checkout(req: &CheckoutRequest) -> std::result::Result<(), &'static str> {
        if req.items.is_empty() {
            return Err(messages::ORDER_EMPTY);
        }
        if req.items.iter().any(|i| i.quantity <= 0) {
            return Err(messages::QUANTITY_INVALID);
        }
        if req.customer_name.trim().is_empty()
            || req.customer_phone.trim().is_empty()
            || req.shipping_address.trim().is_empty()
        {
            return Err(messages::ORDER_CONTACT_REQUIRED);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(product_id: i32, quantity: i32) -> CheckoutItem {
        CheckoutItem {
            product_id: ProductId::new(product_id),
            quantity,
        }
    }

    #[test]
    fn repeated_product_lines_are_summed() {
        let wanted =
            OrderRepository::aggregate_items(&[item(7, 4), item(9, 1), item(7, 4)]).unwrap();
        assert_eq!(
            wanted,
            vec![(ProductId::new(7), 8), (ProductId::new(9), 1)]
        );
    }

    #[test]
    fn distinct_products_keep_request_order() {
        let wanted =
            OrderRepository::aggregate_items(&[item(3, 2), item(1, 1), item(2, 5)]).unwrap();
        assert_eq!(
            wanted,
            vec![
                (ProductId::new(3), 2),
                (ProductId::new(1), 1),
                (ProductId::new(2), 5),
            ]
        );
    }

    #[test]
    fn summed_quantity_overflow_is_a_conflict() {
        let result = OrderRepository::aggregate_items(&[item(1, i32::MAX), item(1, 1)]);
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }
}
