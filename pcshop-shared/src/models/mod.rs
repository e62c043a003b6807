/// Database models for the PC Shop catalog
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `category`: Hierarchical product categories
/// - `brand`: Manufacturers
/// - `product`: Sellable products and their joined listing rows
/// - `product_image`: Product images with the main-image flag
/// - `user`: Customer and staff accounts
/// - `order`: Customer orders and per-user statistics
/// - `filter`: Query-string helpers for the back-office list filters
///
/// # Example
///
/// ```no_run
/// use pcshop_shared::models::brand::{Brand, CreateBrand};
/// use pcshop_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let brand = Brand::create(
///     &pool,
///     CreateBrand {
///         name: "ASUS".to_string(),
///         slug: "asus".to_string(),
///         description: String::new(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod brand;
pub mod category;
pub mod filter;
pub mod order;
pub mod product;
pub mod product_image;
pub mod user;
