/// Order model and database operations
///
/// Orders belong to exactly one user and are deleted with it. They are
/// listed newest first. Per-user aggregates (order count and total spend)
/// are computed here in SQL; see [`crate::catalog::stats`] for the policy.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE order_status AS ENUM (
///     'pending', 'processing', 'shipped', 'delivered', 'cancelled'
/// );
///
/// CREATE TABLE orders (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     total_price NUMERIC(10, 2) NOT NULL,
///     paid BOOLEAN NOT NULL DEFAULT FALSE,
///     status order_status NOT NULL DEFAULT 'pending'
/// );
/// ```

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::like_pattern;
use super::filter::{blank_as_none, since_now, DateRange};
use crate::catalog::stats::{SpendPolicy, UserStats};

/// Number of orders shown in a user's purchase history
pub const PURCHASE_HISTORY_LIMIT: i64 = 15;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, not yet handled
    #[default]
    Pending,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status: {}", s))
    }
}

/// Customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Order ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// When the order was placed
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,

    /// Order total
    pub total_price: Decimal,

    /// Whether payment was received
    pub paid: bool,

    /// Lifecycle status
    pub status: OrderStatus,
}

/// Order row joined with its owner, for back-office lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderWithUser {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_price: Decimal,
    pub paid: bool,
    pub status: OrderStatus,
}

/// Input for creating an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub user_id: i64,
    pub total_price: Decimal,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Input for updating an order
///
/// Timestamps are not writable; `updated_at` is refreshed on every update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrder {
    pub user_id: Option<i64>,
    pub total_price: Option<Decimal>,
    pub paid: Option<bool>,
    pub status: Option<OrderStatus>,
}

/// Filters for the back-office order list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub paid: Option<bool>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<OrderStatus>,

    /// Placed within this window
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created: Option<DateRange>,

    /// Case-insensitive match on the owner's username or email
    pub q: Option<String>,
}

const ORDER_COLUMNS: &str = "id, user_id, created_at, updated_at, total_price, paid, status";

impl Order {
    /// Creates a new order
    pub async fn create(pool: &PgPool, data: CreateOrder) -> Result<Self, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (user_id, total_price, paid, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(data.user_id)
        .bind(data.total_price)
        .bind(data.paid)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(order)
    }

    /// Finds an order by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(order)
    }

    /// Updates an order; fields left as None keep their value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateOrder,
    ) -> Result<Option<Self>, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET updated_at = NOW(),
                user_id = COALESCE($2, user_id),
                total_price = COALESCE($3, total_price),
                paid = COALESCE($4, paid),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(data.user_id)
        .bind(data.total_price)
        .bind(data.paid)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(order)
    }

    /// Lists a user's most recent orders, newest first
    pub async fn recent_for_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {}
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders matching back-office filters, newest first
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithUser>, sqlx::Error> {
        let orders = sqlx::query_as::<_, OrderWithUser>(
            r#"
            SELECT o.id, o.user_id, u.username, u.email, o.created_at, o.updated_at,
                   o.total_price, o.paid, o.status
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE ($1::bigint IS NULL OR o.user_id = $1)
              AND ($2::boolean IS NULL OR o.paid = $2)
              AND ($3::order_status IS NULL OR o.status = $3)
              AND ($4::text IS NULL OR u.username ILIKE $4 OR u.email ILIKE $4)
              AND ($5::timestamptz IS NULL OR o.created_at >= $5)
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.paid)
        .bind(filter.status)
        .bind(filter.q.as_deref().map(like_pattern))
        .bind(since_now(filter.created))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders matching back-office filters
    pub async fn count_filtered(pool: &PgPool, filter: &OrderFilter) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE ($1::bigint IS NULL OR o.user_id = $1)
              AND ($2::boolean IS NULL OR o.paid = $2)
              AND ($3::order_status IS NULL OR o.status = $3)
              AND ($4::text IS NULL OR u.username ILIKE $4 OR u.email ILIKE $4)
              AND ($5::timestamptz IS NULL OR o.created_at >= $5)
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.paid)
        .bind(filter.status)
        .bind(filter.q.as_deref().map(like_pattern))
        .bind(since_now(filter.created))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Order count and total spend for one user
    ///
    /// A user without orders yields zero for both values.
    pub async fn stats_for_user(
        pool: &PgPool,
        user_id: i64,
        policy: SpendPolicy,
    ) -> Result<UserStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT COUNT(*) AS order_count,
                   COALESCE(
                       SUM(total_price) FILTER (WHERE $2 OR (paid AND status <> 'cancelled')),
                       0
                   ) AS total_spent
            FROM orders
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(policy.includes_unsettled())
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Statistics for many users in one grouped query
    ///
    /// Users without orders are absent from the map; callers fall back to
    /// [`UserStats::default`].
    pub async fn stats_for_users(
        pool: &PgPool,
        user_ids: &[i64],
        policy: SpendPolicy,
    ) -> Result<HashMap<i64, UserStats>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT user_id,
                   COUNT(*),
                   COALESCE(
                       SUM(total_price) FILTER (WHERE $2 OR (paid AND status <> 'cancelled')),
                       0
                   )
            FROM orders
            WHERE user_id = ANY($1)
            GROUP BY user_id
            "#,
        )
        .bind(user_ids)
        .bind(policy.includes_unsettled())
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, order_count, total_spent)| {
                (
                    user_id,
                    UserStats {
                        order_count,
                        total_spent,
                    },
                )
            })
            .collect())
    }

    /// Id label shown in lists, e.g. `Order #42`
    pub fn label(&self) -> String {
        format!("Order #{}", self.id)
    }
}
