/// Back-office endpoints
///
/// Everything here except `POST /admin/login` is mounted behind the staff
/// authentication middleware, which puts a
/// [`StaffIdentity`](crate::middleware::staff_auth::StaffIdentity) into the
/// request extensions.
///
/// - `auth`: login and current user
/// - `categories`, `brands`: catalog taxonomy CRUD
/// - `products`: product CRUD, inline images and bulk actions
/// - `users`: user CRUD with order statistics and purchase history
/// - `orders`: order list and edits

pub mod auth;
pub mod brands;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::app::AppState;

/// Routes that require a staff token
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/brands", get(brands::list_brands).post(brands::create_brand))
        .route(
            "/brands/:id",
            get(brands::get_brand)
                .put(brands::update_brand)
                .delete(brands::delete_brand),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/actions", post(products::run_action))
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/:id/images", post(products::add_image))
        .route(
            "/products/:id/images/:image_id",
            put(products::update_image).delete(products::delete_image),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/:id",
            get(orders::get_order).put(orders::update_order),
        )
}

/// `?q=` search parameter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// Trimmed search term; blank means no search
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Result of a bulk action
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub action: String,
    pub selected: usize,
    pub updated: u64,
}

/// Distinguishes an absent field from an explicit `null`
///
/// Used with `#[serde(default, deserialize_with = "double_option")]`:
/// absent gives `None`, `null` gives `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcshop_shared::models::{
        category::CategoryFilter,
        filter::DateRange,
        order::{OrderFilter, OrderStatus},
        product::ProductFilter,
        user::UserFilter,
    };

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i64>>,
    }

    #[test]
    fn test_double_option() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.parent_id, None);

        let null: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(null.parent_id, Some(None));

        let set: Patch = serde_json::from_str(r#"{"parent_id": 4}"#).unwrap();
        assert_eq!(set.parent_id, Some(Some(4)));
    }

    #[test]
    fn test_search_term_ignores_blank() {
        let query = SearchQuery {
            q: Some("   ".to_string()),
        };
        assert_eq!(query.term(), None);

        let query = SearchQuery {
            q: Some(" rtx ".to_string()),
        };
        assert_eq!(query.term(), Some("rtx"));
    }

    fn query<T: serde::de::DeserializeOwned>(uri: &str) -> Result<T, String> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        axum::extract::Query::<T>::try_from_uri(&uri)
            .map(|axum::extract::Query(value)| value)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_blank_list_filters_mean_no_filter() {
        let filter: CategoryFilter = query("/admin/categories?parent_id=&q=").unwrap();
        assert_eq!(filter.parent_id, None);

        let filter: ProductFilter =
            query("/admin/products?category_id=&brand_id=&available=&created=&updated=").unwrap();
        assert_eq!(filter.category_id, None);
        assert_eq!(filter.brand_id, None);
        assert_eq!(filter.available, None);
        assert_eq!(filter.created, None);

        let filter: OrderFilter = query("/admin/orders?user_id=&paid=&status=").unwrap();
        assert_eq!(filter.user_id, None);
        assert_eq!(filter.status, None);

        let filter: UserFilter = query("/admin/users?is_staff=&is_active=&date_joined=").unwrap();
        assert_eq!(filter.is_staff, None);
        assert_eq!(filter.date_joined, None);
    }

    #[test]
    fn test_list_filters_parse_values() {
        let filter: ProductFilter =
            query("/admin/products?category_id=3&available=false&updated=this_month").unwrap();
        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.available, Some(false));
        assert_eq!(filter.updated, Some(DateRange::ThisMonth));

        let filter: OrderFilter = query("/admin/orders?user_id=7&status=shipped&created=today").unwrap();
        assert_eq!(filter.user_id, Some(7));
        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert_eq!(filter.created, Some(DateRange::Today));

        let filter: UserFilter =
            query("/admin/users?is_staff=true&is_superuser=false&q=ann").unwrap();
        assert_eq!(filter.is_staff, Some(true));
        assert_eq!(filter.is_superuser, Some(false));
        assert_eq!(filter.q.as_deref(), Some("ann"));

        assert!(query::<ProductFilter>("/admin/products?category_id=abc").is_err());
    }
}

