//! Aggregate queries behind the admin dashboard.
//!
//! Revenue figures count delivered orders only; a pending or cancelled
//! order is not income.

use chrono::NaiveDate;
use gearshop_core::{OrderStatus, ProductId, Vnd};
use sqlx::PgPool;

use super::{RepositoryError, Result};
use crate::models::statistics::{
    DailyRevenue, Dashboard, LowStockProduct, StatusCount, Totals, TopProduct,
};

const LOW_STOCK_THRESHOLD: i32 = 5;
const TOP_PRODUCT_LIMIT: i64 = 10;
const RECENT_ORDER_LIMIT: i64 = 10;

pub struct StatisticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatisticsRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Assemble the dashboard for the inclusive `[from, to]` date range.
    pub async fn dashboard(&self, from: NaiveDate, to: NaiveDate) -> Result<Dashboard> {
        let totals = self.totals(from, to).await?;
        let orders_by_status = self.orders_by_status(from, to).await?;
        let revenue_by_day = self.revenue_by_day(from, to).await?;
        let top_products = self.top_products(from, to).await?;
        let recent_orders = self.recent_orders().await?;
        let low_stock = self.low_stock().await?;
        Ok(Dashboard {
            totals,
            orders_by_status,
            revenue_by_day,
            top_products,
            recent_orders,
            low_stock,
        })
    }

    async fn totals(&self, from: NaiveDate, to: NaiveDate) -> Result<Totals> {
        let (revenue, orders): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total) FILTER (WHERE status = 'delivered'), 0),
                    COUNT(*)
             FROM orders
             WHERE created_at >= $1 AND created_at < $2 + INTERVAL '1 day'",
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        let new_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
             WHERE created_at >= $1 AND created_at < $2 + INTERVAL '1 day'",
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        let products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(self.pool)
                .await?;

        Ok(Totals {
            revenue: Vnd::new(revenue),
            orders,
            new_users,
            products,
        })
    }

    async fn orders_by_status(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<StatusCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*)
             FROM orders
             WHERE created_at >= $1 AND created_at < $2 + INTERVAL '1 day'
             GROUP BY status",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status: OrderStatus = status
                    .parse()
                    .map_err(RepositoryError::DataCorruption)?;
                Ok(StatusCount { status, count })
            })
            .collect()
    }

    async fn revenue_by_day(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyRevenue>> {
        let rows: Vec<(NaiveDate, i64, i64)> = sqlx::query_as(
            "SELECT created_at::date AS day,
                    COALESCE(SUM(total) FILTER (WHERE status = 'delivered'), 0),
                    COUNT(*)
             FROM orders
             WHERE created_at >= $1 AND created_at < $2 + INTERVAL '1 day'
             GROUP BY day
             ORDER BY day",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(day, revenue, orders)| DailyRevenue {
                day: day.format("%Y-%m-%d").to_string(),
                revenue: Vnd::new(revenue),
                orders,
            })
            .collect())
    }

    async fn top_products(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TopProduct>> {
        let rows: Vec<(ProductId, String, i64, i64)> = sqlx::query_as(
            "SELECT oi.product_id, oi.product_name,
                    SUM(oi.quantity)::bigint,
                    SUM(oi.unit_price * oi.quantity)::bigint
             FROM order_items oi
             JOIN orders o ON o.id = oi.order_id
             WHERE o.status = 'delivered'
               AND o.created_at >= $1 AND o.created_at < $2 + INTERVAL '1 day'
             GROUP BY oi.product_id, oi.product_name
             ORDER BY SUM(oi.quantity) DESC
             LIMIT $3",
        )
        .bind(from)
        .bind(to)
        .bind(TOP_PRODUCT_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, name, units_sold, revenue)| TopProduct {
                product_id,
                name,
                units_sold,
                revenue: Vnd::new(revenue),
            })
            .collect())
    }

    async fn recent_orders(&self) -> Result<Vec<crate::models::order::Order>> {
        let (orders, _) = super::orders::OrderRepository::new(self.pool)
            .list_admin(
                &crate::models::order::OrderFilter::default(),
                1,
                RECENT_ORDER_LIMIT,
            )
            .await?;
        Ok(orders)
    }

    async fn low_stock(&self) -> Result<Vec<LowStockProduct>> {
        let rows: Vec<(ProductId, String, String, i32)> = sqlx::query_as(
            "SELECT id, name, product_code, stock
             FROM products
             WHERE deleted_at IS NULL AND is_active AND stock <= $1
             ORDER BY stock, id",
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, name, product_code, stock)| LowStockProduct {
                product_id,
                name,
                product_code,
                stock,
            })
            .collect())
    }
}
