//! # PC Shop API Server Library
//!
//! HTTP surface of the PC Shop catalog: storefront listings, product
//! detail, the public user index and the staff back office.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers and staff authentication
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
