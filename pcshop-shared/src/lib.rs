//! # PC Shop Shared Library
//!
//! Catalog data layer and business logic used by the PC Shop API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `catalog`: Storefront logic (display images, category tree, statistics)
//! - `backoffice`: Staff-facing catalog, user and order administration
//! - `auth`: Password hashing and staff tokens
//! - `db`: Connection pool and migrations
//! - `error`: Common error types

pub mod auth;
pub mod backoffice;
pub mod catalog;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the PC Shop shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
