//! Storefront catalog queries
//!
//! Builds the paginated listings (everything, a category subtree, a brand),
//! the product detail view and the public user index. Each listing costs a
//! fixed number of queries: a count, one joined page query and one batch
//! image query, plus the navigation lists.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::debug;

use super::display::{self, DisplayImage, ImagePreview, Presentation};
use super::pagination::{Page, PageWindow, STOREFRONT_PAGE_SIZE};
use crate::error::{CatalogError, CatalogResult};
use crate::models::brand::Brand;
use crate::models::category::Category;
use crate::models::product::{Product, ProductListing, ProductScope};
use crate::models::product_image::ProductImage;
use crate::models::user::User;

/// Maximum number of related products on a detail page
pub const RELATED_LIMIT: i64 = 4;

/// Name and slug of a product's category or brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Product as shown in a listing
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub stock: i32,

    /// Storefront path of the detail page
    pub url: String,

    pub category: Link,
    pub brand: Link,

    /// Compact display image
    pub image: ImagePreview,
}

/// A listing page plus navigation context
#[derive(Debug, Clone, Serialize)]
pub struct ProductList {
    pub products: Page<ProductCard>,

    /// Every category, for navigation
    pub categories: Vec<Category>,

    /// Every brand, for navigation
    pub brands: Vec<Brand>,

    /// The category being browsed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// The brand being browsed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
}

/// Product detail page
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Link,
    pub brand: Link,

    /// Full-size display image
    pub image: ImagePreview,

    /// Remaining images, insertion order, without the display image
    pub other_images: Vec<ImagePreview>,

    /// Up to [`RELATED_LIMIT`] other products from the same category
    pub related: Vec<ProductCard>,
}

/// Storefront path of a product detail page
pub fn product_url(id: i64, slug: &str) -> String {
    format!("/product/{}/{}/", id, slug)
}

/// Every available product, newest first
pub async fn list_products(
    pool: &PgPool,
    media_url: &str,
    page: Option<&str>,
) -> CatalogResult<ProductList> {
    let products = list_scope(pool, media_url, &ProductScope::all(), page).await?;
    with_navigation(pool, products, None, None).await
}

/// Available products in a category and all of its descendants
///
/// # Errors
///
/// [`CatalogError::NotFound`] if no category has this slug
pub async fn list_by_category(
    pool: &PgPool,
    media_url: &str,
    slug: &str,
    page: Option<&str>,
) -> CatalogResult<ProductList> {
    let category = Category::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| CatalogError::not_found("Category"))?;

    let tree = Category::load_tree(pool).await?;
    let ids = tree.descendants(category.id, true);
    debug!(category_id = category.id, subtree = ids.len(), "Listing category subtree");

    let products = list_scope(pool, media_url, &ProductScope::categories(ids), page).await?;
    with_navigation(pool, products, Some(category), None).await
}

/// Available products of a brand
///
/// # Errors
///
/// [`CatalogError::NotFound`] if no brand has this slug
pub async fn list_by_brand(
    pool: &PgPool,
    media_url: &str,
    slug: &str,
    page: Option<&str>,
) -> CatalogResult<ProductList> {
    let brand = Brand::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| CatalogError::not_found("Brand"))?;

    let products = list_scope(pool, media_url, &ProductScope::brand(brand.id), page).await?;
    with_navigation(pool, products, None, Some(brand)).await
}

/// The available product matching both `id` and `slug`
///
/// # Errors
///
/// [`CatalogError::NotFound`] if the pair does not match an available product
pub async fn product_detail(
    pool: &PgPool,
    media_url: &str,
    id: i64,
    slug: &str,
) -> CatalogResult<ProductDetail> {
    let product = Product::find_available_listing(pool, id, slug)
        .await?
        .ok_or_else(|| CatalogError::not_found("Product"))?;

    let images = ProductImage::list_for_product(pool, product.id).await?;
    let (shown, others) = display::split_for_detail(&images);

    let image = ImagePreview::new(shown, Presentation::Full, media_url, &product.name);
    let other_images = others
        .into_iter()
        .map(|img| {
            ImagePreview::new(
                DisplayImage::Image(img),
                Presentation::Full,
                media_url,
                &product.name,
            )
        })
        .collect();

    let related =
        Product::related(pool, product.id, product.category_id, RELATED_LIMIT).await?;
    let related = cards(pool, media_url, related).await?;

    Ok(ProductDetail {
        id: product.id,
        category: category_link(&product),
        brand: brand_link(&product),
        name: product.name,
        slug: product.slug,
        description: product.description,
        price: product.price,
        stock: product.stock,
        image,
        other_images,
        related,
    })
}

async fn list_scope(
    pool: &PgPool,
    media_url: &str,
    scope: &ProductScope,
    page: Option<&str>,
) -> CatalogResult<Page<ProductCard>> {
    let total = Product::count_available(pool, scope).await?;
    let window = PageWindow::resolve(page, total, STOREFRONT_PAGE_SIZE)?;

    let rows = Product::list_available(pool, scope, window.limit(), window.offset).await?;
    let items = cards(pool, media_url, rows).await?;

    Ok(Page::new(items, window))
}

async fn with_navigation(
    pool: &PgPool,
    products: Page<ProductCard>,
    category: Option<Category>,
    brand: Option<Brand>,
) -> CatalogResult<ProductList> {
    let categories = Category::list_all(pool).await?;
    let brands = Brand::list(pool, None).await?;

    Ok(ProductList {
        products,
        categories,
        brands,
        category,
        brand,
    })
}

/// Turns joined rows into cards, fetching all their images in one query
pub(crate) async fn cards(
    pool: &PgPool,
    media_url: &str,
    rows: Vec<ProductListing>,
) -> CatalogResult<Vec<ProductCard>> {
    let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
    let images = group_by_product(ProductImage::list_for_products(pool, &ids).await?);

    Ok(rows
        .into_iter()
        .map(|row| {
            let product_images = images.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);
            card(row, product_images, media_url)
        })
        .collect())
}

/// Builds one card from a joined row and that product's images
pub fn card(row: ProductListing, images: &[ProductImage], media_url: &str) -> ProductCard {
    ProductCard {
        image: ImagePreview::for_images(images, Presentation::Compact, media_url, &row.name),
        url: product_url(row.id, &row.slug),
        category: category_link(&row),
        brand: brand_link(&row),
        id: row.id,
        name: row.name,
        slug: row.slug,
        price: row.price,
        stock: row.stock,
    }
}

/// Groups images by product, keeping insertion order within each product
pub fn group_by_product(images: Vec<ProductImage>) -> HashMap<i64, Vec<ProductImage>> {
    let mut grouped: HashMap<i64, Vec<ProductImage>> = HashMap::new();
    for image in images {
        grouped.entry(image.product_id).or_default().push(image);
    }
    grouped
}

fn category_link(row: &ProductListing) -> Link {
    Link {
        id: row.category_id,
        name: row.category_name.clone(),
        slug: row.category_slug.clone(),
    }
}

fn brand_link(row: &ProductListing) -> Link {
    Link {
        id: row.brand_id,
        name: row.brand_name.clone(),
        slug: row.brand_slug.clone(),
    }
}

/// Entry of the public user index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserEntry {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Every user, alphabetical by username
pub async fn user_index(pool: &PgPool) -> CatalogResult<Vec<UserEntry>> {
    let users = User::list_by_username(pool).await?;
    Ok(users.into_iter().map(UserEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn listing(id: i64) -> ProductListing {
        ProductListing {
            id,
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            description: String::new(),
            price: dec!(999.00),
            stock: 3,
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category_id: 2,
            category_name: "Gaming Laptops".to_string(),
            category_slug: "gaming-laptops".to_string(),
            brand_id: 5,
            brand_name: "Asus".to_string(),
            brand_slug: "asus".to_string(),
        }
    }

    fn image(id: i64, product_id: i64, is_main: bool) -> ProductImage {
        ProductImage {
            id,
            product_id,
            image: format!("products/{}.jpg", id),
            is_main,
        }
    }

    #[test]
    fn test_product_url() {
        assert_eq!(product_url(42, "rtx-4090"), "/product/42/rtx-4090/");
    }

    #[test]
    fn test_card_uses_compact_display_image() {
        let images = vec![image(10, 1, false), image(11, 1, true)];
        let card = card(listing(1), &images, "/media/");

        assert_eq!(card.image.image_id, Some(11));
        assert_eq!(card.image.width, 50);
        assert_eq!(card.image.url.as_deref(), Some("/media/products/11.jpg"));
        assert_eq!(card.category.slug, "gaming-laptops");
        assert_eq!(card.brand.name, "Asus");
        assert_eq!(card.url, "/product/1/product-1/");
    }

    #[test]
    fn test_card_without_images_shows_placeholder() {
        let card = card(listing(1), &[], "/media/");
        assert!(card.image.placeholder);
        assert!(card.image.url.is_none());
    }

    #[test]
    fn test_group_by_product_keeps_order() {
        let grouped = group_by_product(vec![
            image(1, 7, false),
            image(2, 7, false),
            image(3, 8, true),
        ]);

        assert_eq!(grouped[&7].iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(grouped[&8].len(), 1);
        assert!(!grouped.contains_key(&9));
    }
}
