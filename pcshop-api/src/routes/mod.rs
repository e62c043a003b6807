/// API route handlers
///
/// This module contains all route handlers organized by surface:
///
/// - `health`: Health check endpoint
/// - `catalog`: Storefront listings and product detail
/// - `users`: Public user index
/// - `admin`: Staff back office (login plus CRUD for every resource)

pub mod admin;
pub mod catalog;
pub mod health;
pub mod users;

use serde::Deserialize;

/// `?page=` query parameter shared by every paginated listing
///
/// Kept as a string so that a non-numeric page reaches the pagination layer
/// and is reported as "not found" rather than as a query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page, if any
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}
