//! Back-office operations
//!
//! The write paths and computed list columns used by the `/admin` surface.
//! Model functions stay thin; this layer adds what an administrator form
//! adds on top of a plain save:
//!
//! - slug derivation and validation for categories, brands and products
//! - parent cycle rejection for categories
//! - the main-image repair after product and inline image saves
//! - bulk product actions
//! - per-user order statistics and purchase history
//!
//! Every function takes the pool and plain values and returns a
//! [`CatalogResult`](crate::error::CatalogResult).

pub mod brands;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use chrono::{DateTime, Utc};

use crate::catalog::slug::{is_valid_slug, slug_or_derive};
use crate::error::{CatalogError, CatalogResult};

/// Short date used in back-office lists, e.g. `05.03.2025`
pub fn short_date(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%Y").to_string()
}

/// Short date and time used in back-office lists, e.g. `05.03.2025 14:07`
pub fn short_stamp(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}

/// Back-office product list pre-filtered by a category or brand
pub fn products_url(filter: &str, id: i64) -> String {
    format!("/admin/products?{}={}", filter, id)
}

/// Resolves the slug to store: the explicit one, or one derived from `name`
///
/// # Errors
///
/// [`CatalogError::Validation`] if the result is empty, malformed or longer
/// than `max_len`
pub(crate) fn resolve_slug(
    explicit: Option<&str>,
    name: &str,
    max_len: usize,
) -> CatalogResult<String> {
    let slug = slug_or_derive(explicit, name);

    if slug.is_empty() {
        return Err(CatalogError::validation(
            "slug",
            "could not derive a slug from the name; provide one explicitly",
        ));
    }
    if !is_valid_slug(&slug) {
        return Err(CatalogError::validation(
            "slug",
            "may only contain lowercase letters, digits, hyphens and underscores",
        ));
    }
    if slug.chars().count() > max_len {
        return Err(CatalogError::validation(
            "slug",
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_short_formats() {
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 14, 7, 59).unwrap();
        assert_eq!(short_date(at), "05.03.2025");
        assert_eq!(short_stamp(at), "05.03.2025 14:07");
    }

    #[test]
    fn test_products_url() {
        assert_eq!(products_url("brand_id", 4), "/admin/products?brand_id=4");
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug(None, "Gaming Laptops", 100).unwrap(), "gaming-laptops");
        assert_eq!(resolve_slug(Some(""), "Gaming Laptops", 100).unwrap(), "gaming-laptops");
        assert_eq!(resolve_slug(Some("laptops-2"), "Gaming", 100).unwrap(), "laptops-2");

        assert!(matches!(
            resolve_slug(None, "Ноутбуки", 100),
            Err(CatalogError::Validation { .. })
        ));
        assert!(resolve_slug(Some("Not A Slug"), "x", 100).is_err());
        assert!(resolve_slug(None, "abcdef", 5).is_err());
    }
}
