//! User administration
//!
//! The user list carries each user's order count and total spend, computed
//! for the whole page in one grouped query. The detail view adds a read-only
//! purchase history. Users can only be deleted one at a time.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use super::{short_date, short_stamp};
use crate::auth::password::{hash_password, validate_password_strength};
use crate::catalog::pagination::{Page, PageWindow, ADMIN_PAGE_SIZE};
use crate::catalog::stats::{SpendPolicy, UserStats};
use crate::error::{CatalogError, CatalogResult};
use crate::models::order::{Order, OrderStatus, PURCHASE_HISTORY_LIMIT};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};

/// User as listed in the back office
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub order_count: i64,

    /// Order list filtered to this user; absent when the user has no orders
    pub orders_url: Option<String>,

    pub total_spent: Decimal,

    /// Join date, `dd.mm.yyyy`
    pub date_joined: String,
}

impl UserRow {
    fn new(user: User, stats: UserStats) -> Self {
        Self {
            orders_url: orders_url(user.id, stats.order_count),
            date_joined: short_date(user.date_joined),
            id: user.id,
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
            is_active: user.is_active,
            order_count: stats.order_count,
            total_spent: stats.total_spent,
        }
    }
}

/// Colored paid/unpaid indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaidBadge {
    pub label: &'static str,
    pub color: &'static str,
}

impl PaidBadge {
    /// Green "Paid" or red "Unpaid"
    pub fn for_order(paid: bool) -> Self {
        if paid {
            Self {
                label: "Paid",
                color: "green",
            }
        } else {
            Self {
                label: "Unpaid",
                color: "red",
            }
        }
    }
}

/// One read-only row of a user's purchase history
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseHistoryEntry {
    pub id: i64,

    /// e.g. `Order #42`
    pub label: String,

    /// Creation stamp, `dd.mm.yyyy HH:MM`
    pub created: String,

    pub total_price: Decimal,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub paid: PaidBadge,

    /// Back-office order page
    pub order_url: String,
}

impl From<Order> for PurchaseHistoryEntry {
    fn from(order: Order) -> Self {
        Self {
            label: order.label(),
            created: short_stamp(order.created_at),
            status_label: order.status.label(),
            paid: PaidBadge::for_order(order.paid),
            order_url: format!("/admin/orders/{}", order.id),
            id: order.id,
            total_price: order.total_price,
            status: order.status,
        }
    }
}

/// User detail view
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,

    pub order_count: i64,
    pub orders_url: Option<String>,
    pub total_spent: Decimal,

    /// Most recent orders first, at most [`PURCHASE_HISTORY_LIMIT`]
    pub purchase_history: Vec<PurchaseHistoryEntry>,
}

/// New user with a plaintext password
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// User edits; a new password is hashed before storage
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Lists users newest joined first, with order statistics
pub async fn list_users(
    pool: &PgPool,
    policy: SpendPolicy,
    filter: &UserFilter,
    page: Option<&str>,
) -> CatalogResult<Page<UserRow>> {
    let total = User::count(pool, filter).await?;
    let window = PageWindow::resolve(page, total, ADMIN_PAGE_SIZE)?;

    let users = User::list(pool, filter, window.limit(), window.offset).await?;
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let stats = Order::stats_for_users(pool, &ids, policy).await?;

    let items = users
        .into_iter()
        .map(|user| {
            let user_stats = stats.get(&user.id).copied().unwrap_or_default();
            UserRow::new(user, user_stats)
        })
        .collect();

    Ok(Page::new(items, window))
}

/// Loads a user with statistics and purchase history
pub async fn get_user(pool: &PgPool, policy: SpendPolicy, id: i64) -> CatalogResult<UserDetail> {
    let user = User::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("User"))?;

    let stats = Order::stats_for_user(pool, id, policy).await?;
    let history = Order::recent_for_user(pool, id, PURCHASE_HISTORY_LIMIT).await?;

    Ok(UserDetail {
        orders_url: orders_url(user.id, stats.order_count),
        user,
        order_count: stats.order_count,
        total_spent: stats.total_spent,
        purchase_history: history.into_iter().map(PurchaseHistoryEntry::from).collect(),
    })
}

/// Creates a user, hashing the password with Argon2id
pub async fn create_user(
    pool: &PgPool,
    policy: SpendPolicy,
    input: NewUser,
) -> CatalogResult<UserDetail> {
    validate_password_strength(&input.password, &input.username)
        .map_err(|msg| CatalogError::validation("password", msg))?;

    let password_hash = hash_password(&input.password)?;

    let user = User::create(
        pool,
        CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            is_active: input.is_active,
            is_staff: input.is_staff,
            is_superuser: input.is_superuser,
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, "User created");
    get_user(pool, policy, user.id).await
}

/// Applies edits to a user
pub async fn update_user(
    pool: &PgPool,
    policy: SpendPolicy,
    id: i64,
    changes: UserChanges,
) -> CatalogResult<UserDetail> {
    let password_hash = match changes.password.as_deref() {
        Some(password) => {
            let username = match changes.username.as_deref() {
                Some(username) => username.to_string(),
                None => {
                    User::find_by_id(pool, id)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("User"))?
                        .username
                }
            };
            validate_password_strength(password, &username)
                .map_err(|msg| CatalogError::validation("password", msg))?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    User::update(
        pool,
        id,
        UpdateUser {
            username: changes.username,
            email: changes.email,
            password_hash,
            first_name: changes.first_name,
            last_name: changes.last_name,
            is_active: changes.is_active,
            is_staff: changes.is_staff,
            is_superuser: changes.is_superuser,
        },
    )
    .await?
    .ok_or_else(|| CatalogError::not_found("User"))?;

    get_user(pool, policy, id).await
}

/// Deletes one user and, by cascade, their orders
pub async fn delete_user(pool: &PgPool, id: i64) -> CatalogResult<()> {
    if !User::delete(pool, id).await? {
        return Err(CatalogError::not_found("User"));
    }

    info!(user_id = id, "User deleted");
    Ok(())
}

fn orders_url(user_id: i64, order_count: i64) -> Option<String> {
    (order_count > 0).then(|| format!("/admin/orders?user_id={}", user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn user() -> User {
        User {
            id: 5,
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password_hash: "$argon2id$x".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc.with_ymd_and_hms(2024, 12, 1, 10, 30, 0).unwrap(),
            last_login: None,
        }
    }

    #[test]
    fn test_user_row_with_orders() {
        let row = UserRow::new(
            user(),
            UserStats {
                order_count: 3,
                total_spent: dec!(149.90),
            },
        );

        assert_eq!(row.orders_url.as_deref(), Some("/admin/orders?user_id=5"));
        assert_eq!(row.total_spent, dec!(149.90));
        assert_eq!(row.date_joined, "01.12.2024");
    }

    #[test]
    fn test_user_row_without_orders() {
        let row = UserRow::new(user(), UserStats::default());

        assert_eq!(row.order_count, 0);
        assert!(row.orders_url.is_none());
        assert_eq!(row.total_spent, Decimal::ZERO);
    }

    #[test]
    fn test_paid_badge() {
        assert_eq!(PaidBadge::for_order(true).label, "Paid");
        assert_eq!(PaidBadge::for_order(true).color, "green");
        assert_eq!(PaidBadge::for_order(false).label, "Unpaid");
        assert_eq!(PaidBadge::for_order(false).color, "red");
    }

    #[test]
    fn test_purchase_history_entry() {
        let created = Utc.with_ymd_and_hms(2025, 2, 14, 18, 45, 0).unwrap();
        let entry = PurchaseHistoryEntry::from(Order {
            id: 42,
            user_id: 5,
            created_at: created,
            updated_at: created,
            total_price: dec!(89.00),
            paid: false,
            status: OrderStatus::Shipped,
        });

        assert_eq!(entry.label, "Order #42");
        assert_eq!(entry.created, "14.02.2025 18:45");
        assert_eq!(entry.status_label, "Shipped");
        assert_eq!(entry.paid.label, "Unpaid");
        assert_eq!(entry.order_url, "/admin/orders/42");
    }

    #[test]
    fn test_user_detail_hides_password_hash() {
        let detail = UserDetail {
            user: user(),
            order_count: 0,
            orders_url: None,
            total_spent: Decimal::ZERO,
            purchase_history: Vec::new(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "bob");
    }
}
