//! Order administration

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use super::short_stamp;
use crate::catalog::pagination::{Page, PageWindow, ADMIN_PAGE_SIZE};
use crate::catalog::pricing::{is_valid_price, MAX_PRICE};
use crate::error::{CatalogError, CatalogResult};
use crate::models::order::{CreateOrder, Order, OrderFilter, OrderStatus, OrderWithUser, UpdateOrder};
use crate::models::user::User;

/// Order as listed in the back office
#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub total_price: Decimal,
    pub paid: bool,
    pub status: OrderStatus,

    /// Creation stamp, `dd.mm.yyyy HH:MM`
    pub created: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderWithUser> for OrderRow {
    fn from(order: OrderWithUser) -> Self {
        Self {
            created: short_stamp(order.created_at),
            id: order.id,
            user_id: order.user_id,
            username: order.username,
            email: order.email,
            total_price: order.total_price,
            paid: order.paid,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Lists orders newest first
pub async fn list_orders(
    pool: &PgPool,
    filter: &OrderFilter,
    page: Option<&str>,
) -> CatalogResult<Page<OrderRow>> {
    let total = Order::count_filtered(pool, filter).await?;
    let window = PageWindow::resolve(page, total, ADMIN_PAGE_SIZE)?;

    let orders = Order::list_filtered(pool, filter, window.limit(), window.offset).await?;

    Ok(Page::new(orders.into_iter().map(OrderRow::from).collect(), window))
}

/// Loads one order
pub async fn get_order(pool: &PgPool, id: i64) -> CatalogResult<Order> {
    Order::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Order"))
}

/// Creates an order for an existing user
pub async fn create_order(pool: &PgPool, input: CreateOrder) -> CatalogResult<Order> {
    validate_total(input.total_price)?;
    ensure_user(pool, input.user_id).await?;

    let order = Order::create(pool, input).await?;
    info!(order_id = order.id, user_id = order.user_id, "Order created");
    Ok(order)
}

/// Applies edits to an order; timestamps are not editable
pub async fn update_order(pool: &PgPool, id: i64, changes: UpdateOrder) -> CatalogResult<Order> {
    if let Some(total) = changes.total_price {
        validate_total(total)?;
    }
    if let Some(user_id) = changes.user_id {
        ensure_user(pool, user_id).await?;
    }

    Order::update(pool, id, changes)
        .await?
        .ok_or_else(|| CatalogError::not_found("Order"))
}

fn validate_total(total: Decimal) -> CatalogResult<()> {
    if is_valid_price(total) {
        Ok(())
    } else {
        Err(CatalogError::validation(
            "total_price",
            format!("must be between 0 and {} with at most 2 decimal places", MAX_PRICE),
        ))
    }
}

async fn ensure_user(pool: &PgPool, user_id: i64) -> CatalogResult<()> {
    match User::find_by_id(pool, user_id).await? {
        Some(_) => Ok(()),
        None => Err(CatalogError::validation(
            "user_id",
            format!("user {} does not exist", user_id),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_row_stamp() {
        let created = Utc.with_ymd_and_hms(2025, 6, 9, 7, 5, 0).unwrap();
        let row = OrderRow::from(OrderWithUser {
            id: 1,
            user_id: 2,
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            created_at: created,
            updated_at: created,
            total_price: dec!(10.00),
            paid: true,
            status: OrderStatus::Delivered,
        });

        assert_eq!(row.created, "09.06.2025 07:05");
        assert_eq!(row.username, "carol");
    }

    #[test]
    fn test_validate_total() {
        assert!(validate_total(dec!(0)).is_ok());
        assert!(validate_total(dec!(-5.00)).is_err());
    }
}
