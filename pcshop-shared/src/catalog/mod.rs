//! Catalog logic
//!
//! Pure building blocks (slugs, the category tree, display images, prices,
//! pagination, user statistics) plus the storefront queries built on them.
//!
//! - `slug`: slug derivation and validation
//! - `tree`: category tree closure and cycle detection
//! - `display`: display image resolution and previews
//! - `pricing`: money rounding and price adjustments
//! - `pagination`: page windows and page envelopes
//! - `stats`: per-user order statistics
//! - `query`: storefront listings, product detail and the user index

pub mod display;
pub mod pagination;
pub mod pricing;
pub mod query;
pub mod slug;
pub mod stats;
pub mod tree;
