//! Product administration
//!
//! Besides CRUD this covers the inline image editor and the bulk actions.
//! Every product save and every inline image save made here ends with
//! [`ensure_main_image`]: if the product has images but none is flagged
//! main, the first one is promoted. The bulk actions skip that
//! step, and so does the plain model save used by the price increase.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};

use super::short_date;
use crate::catalog::display::{self, DisplayImage, ImagePreview, Presentation};
use crate::catalog::pagination::{Page, PageWindow, ADMIN_PAGE_SIZE};
use crate::catalog::pricing::{increase_by_ten_percent, is_valid_price, MAX_PRICE};
use crate::catalog::query::{group_by_product, Link};
use crate::error::{CatalogError, CatalogResult};
use crate::models::brand::Brand;
use crate::models::category::Category;
use crate::models::product::{
    CreateProduct, Product, ProductFilter, ProductListing, UpdateProduct,
};
use crate::models::product_image::{CreateProductImage, ProductImage, UpdateProductImage};

const SLUG_MAX_LEN: usize = 200;

/// Product as listed in the back office
#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub stock: i32,
    pub available: bool,
    pub category: Link,
    pub brand: Link,

    /// Creation date, `dd.mm.yyyy`
    pub created: String,

    /// Compact display image
    pub image: ImagePreview,

    /// Whether any image carries the main flag
    pub has_main_image: bool,
}

/// Image row of the inline image editor
#[derive(Debug, Clone, Serialize)]
pub struct InlineImage {
    pub id: i64,
    pub image: String,
    pub is_main: bool,
    pub preview: ImagePreview,
}

/// Product edit form
#[derive(Debug, Clone, Serialize)]
pub struct ProductForm {
    #[serde(flatten)]
    pub product: ProductListing,

    /// Full-size display image preview
    pub main_image_preview: ImagePreview,

    /// Images in insertion order
    pub images: Vec<InlineImage>,
}

/// New product; a blank slug is derived from the name
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub price: Decimal,
    pub category_id: i64,
    pub brand_id: i64,
    pub stock: i32,
    pub available: bool,
}

/// Product edits, including inline list edits of price, stock and availability
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub stock: Option<i32>,
    pub available: Option<bool>,
}

/// New inline image
#[derive(Debug, Clone)]
pub struct NewImage {
    pub image: String,
    pub is_main: bool,
}

/// Lists products for the back office, [`ADMIN_PAGE_SIZE`] per page
pub async fn list_products(
    pool: &PgPool,
    media_url: &str,
    filter: &ProductFilter,
    page: Option<&str>,
) -> CatalogResult<Page<ProductRow>> {
    let total = Product::count_admin(pool, filter).await?;
    let window = PageWindow::resolve(page, total, ADMIN_PAGE_SIZE)?;

    let rows = Product::list_admin(pool, filter, window.limit(), window.offset).await?;
    let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
    let images = group_by_product(ProductImage::list_for_products(pool, &ids).await?);

    let items = rows
        .into_iter()
        .map(|row| {
            let product_images = images.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);
            product_row(row, product_images, media_url)
        })
        .collect();

    Ok(Page::new(items, window))
}

/// Loads the edit form of a product
pub async fn get_product(pool: &PgPool, media_url: &str, id: i64) -> CatalogResult<ProductForm> {
    let product = Product::find_listing(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Product"))?;
    let images = ProductImage::list_for_product(pool, id).await?;

    Ok(product_form(product, &images, media_url))
}

/// Creates a product
///
/// # Errors
///
/// [`CatalogError::Validation`] for an unusable slug or price, or an unknown
/// category or brand
pub async fn create_product(
    pool: &PgPool,
    media_url: &str,
    input: NewProduct,
) -> CatalogResult<ProductForm> {
    let slug = resolve_product_slug(input.slug.as_deref(), &input.name)?;
    validate_price(input.price)?;
    ensure_category(pool, input.category_id).await?;
    ensure_brand(pool, input.brand_id).await?;

    let product = Product::create(
        pool,
        CreateProduct {
            name: input.name,
            slug,
            description: input.description,
            price: input.price,
            category_id: input.category_id,
            brand_id: input.brand_id,
            stock: input.stock,
            available: input.available,
        },
    )
    .await?;

    info!(product_id = product.id, slug = %product.slug, "Product created");
    ensure_main_image(pool, product.id).await?;
    get_product(pool, media_url, product.id).await
}

/// Applies edits to a product, then repairs the main image flag
pub async fn update_product(
    pool: &PgPool,
    media_url: &str,
    id: i64,
    changes: ProductChanges,
) -> CatalogResult<ProductForm> {
    if let Some(price) = changes.price {
        validate_price(price)?;
    }
    if let Some(category_id) = changes.category_id {
        ensure_category(pool, category_id).await?;
    }
    if let Some(brand_id) = changes.brand_id {
        ensure_brand(pool, brand_id).await?;
    }

    let slug = match changes.slug.as_deref() {
        Some(explicit) => {
            let name = match changes.name.as_deref() {
                Some(name) => name.to_string(),
                None => {
                    Product::find_by_id(pool, id)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("Product"))?
                        .name
                }
            };
            Some(resolve_product_slug(Some(explicit), &name)?)
        }
        None => None,
    };

    Product::update(
        pool,
        id,
        UpdateProduct {
            name: changes.name,
            slug,
            description: changes.description,
            price: changes.price,
            category_id: changes.category_id,
            brand_id: changes.brand_id,
            stock: changes.stock,
            available: changes.available,
        },
    )
    .await?
    .ok_or_else(|| CatalogError::not_found("Product"))?;

    ensure_main_image(pool, id).await?;
    get_product(pool, media_url, id).await
}

/// Deletes a product and its images
pub async fn delete_product(pool: &PgPool, id: i64) -> CatalogResult<()> {
    if !Product::delete(pool, id).await? {
        return Err(CatalogError::not_found("Product"));
    }

    info!(product_id = id, "Product deleted");
    Ok(())
}

/// Attaches an image to a product
///
/// An image saved as main demotes the product's other main images.
pub async fn add_image(
    pool: &PgPool,
    media_url: &str,
    product_id: i64,
    input: NewImage,
) -> CatalogResult<ProductForm> {
    if Product::find_by_id(pool, product_id).await?.is_none() {
        return Err(CatalogError::not_found("Product"));
    }

    let image = ProductImage::create(
        pool,
        CreateProductImage {
            product_id,
            image: input.image,
            is_main: input.is_main,
        },
    )
    .await?;

    if image.is_main {
        ProductImage::demote_others(pool, product_id, image.id).await?;
    }

    ensure_main_image(pool, product_id).await?;
    get_product(pool, media_url, product_id).await
}

/// Edits an inline image
pub async fn update_image(
    pool: &PgPool,
    media_url: &str,
    product_id: i64,
    image_id: i64,
    changes: UpdateProductImage,
) -> CatalogResult<ProductForm> {
    let image = ProductImage::update(pool, product_id, image_id, changes)
        .await?
        .ok_or_else(|| CatalogError::not_found("Product image"))?;

    if image.is_main {
        ProductImage::demote_others(pool, product_id, image.id).await?;
    }

    ensure_main_image(pool, product_id).await?;
    get_product(pool, media_url, product_id).await
}

/// Removes an inline image
///
/// Deleting the main image promotes the first remaining one.
pub async fn delete_image(
    pool: &PgPool,
    media_url: &str,
    product_id: i64,
    image_id: i64,
) -> CatalogResult<ProductForm> {
    if !ProductImage::delete(pool, product_id, image_id).await? {
        return Err(CatalogError::not_found("Product image"));
    }

    ensure_main_image(pool, product_id).await?;
    get_product(pool, media_url, product_id).await
}

/// Promotes the first image to main when a product has images but no main one
///
/// Returns the promoted image ID, if a repair happened.
pub async fn ensure_main_image(pool: &PgPool, product_id: i64) -> CatalogResult<Option<i64>> {
    let images = ProductImage::list_for_product(pool, product_id).await?;

    match display::main_image_repair_candidate(&images) {
        Some(candidate) => {
            ProductImage::mark_main(pool, candidate.id).await?;
            info!(product_id, image_id = candidate.id, "Promoted first image to main");
            Ok(Some(candidate.id))
        }
        None => Ok(None),
    }
}

/// Bulk action: sets the available flag on the selected products
///
/// One UPDATE statement; returns the number of rows changed.
pub async fn mark_available(pool: &PgPool, ids: &[i64], available: bool) -> CatalogResult<u64> {
    let updated = Product::set_available(pool, ids, available).await?;
    info!(selected = ids.len(), updated, available, "Bulk availability update");
    Ok(updated)
}

/// Bulk action: raises the price of the selected products by 10%
///
/// New prices are rounded to cents and saved one product at a time through
/// the plain model save. Returns the number of products saved.
///
/// # Errors
///
/// [`CatalogError::Validation`] if any new price would not fit the price
/// column; nothing is saved in that case
pub async fn increase_price_by_10_percent(pool: &PgPool, ids: &[i64]) -> CatalogResult<u64> {
    let mut products = Product::find_by_ids(pool, ids).await?;

    for product in &mut products {
        let new_price = increase_by_ten_percent(product.price);
        if new_price > MAX_PRICE {
            return Err(CatalogError::validation(
                "price",
                format!("raising product {} by 10% exceeds {}", product.id, MAX_PRICE),
            ));
        }
        product.price = new_price;
    }

    let mut saved = 0;
    for product in &products {
        if product.save(pool).await?.is_some() {
            saved += 1;
        }
        debug!(product_id = product.id, price = %product.price, "Price increased");
    }

    info!(selected = ids.len(), saved, "Prices increased by 10%");
    Ok(saved)
}

/// Builds a list row from a joined product and its images
pub fn product_row(row: ProductListing, images: &[ProductImage], media_url: &str) -> ProductRow {
    ProductRow {
        image: ImagePreview::for_images(images, Presentation::Compact, media_url, &row.name),
        has_main_image: display::has_main_image(images),
        created: short_date(row.created_at),
        category: Link {
            id: row.category_id,
            name: row.category_name,
            slug: row.category_slug,
        },
        brand: Link {
            id: row.brand_id,
            name: row.brand_name,
            slug: row.brand_slug,
        },
        id: row.id,
        name: row.name,
        slug: row.slug,
        price: row.price,
        stock: row.stock,
        available: row.available,
    }
}

/// Builds the edit form from a joined product and its images
pub fn product_form(product: ProductListing, images: &[ProductImage], media_url: &str) -> ProductForm {
    let main_image_preview =
        ImagePreview::for_images(images, Presentation::Full, media_url, &product.name);

    let images = images
        .iter()
        .map(|img| InlineImage {
            id: img.id,
            image: img.image.clone(),
            is_main: img.is_main,
            preview: ImagePreview::new(
                DisplayImage::Image(img),
                Presentation::Inline,
                media_url,
                &product.name,
            ),
        })
        .collect();

    ProductForm {
        product,
        main_image_preview,
        images,
    }
}

fn resolve_product_slug(explicit: Option<&str>, name: &str) -> CatalogResult<String> {
    super::resolve_slug(explicit, name, SLUG_MAX_LEN)
}

fn validate_price(price: Decimal) -> CatalogResult<()> {
    if is_valid_price(price) {
        Ok(())
    } else {
        Err(CatalogError::validation(
            "price",
            format!("must be between 0 and {} with at most 2 decimal places", MAX_PRICE),
        ))
    }
}

async fn ensure_category(pool: &PgPool, id: i64) -> CatalogResult<()> {
    match Category::find_by_id(pool, id).await? {
        Some(_) => Ok(()),
        None => Err(CatalogError::validation(
            "category_id",
            format!("category {} does not exist", id),
        )),
    }
}

async fn ensure_brand(pool: &PgPool, id: i64) -> CatalogResult<()> {
    match Brand::find_by_id(pool, id).await? {
        Some(_) => Ok(()),
        None => Err(CatalogError::validation(
            "brand_id",
            format!("brand {} does not exist", id),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn listing() -> ProductListing {
        let created = Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap();
        ProductListing {
            id: 1,
            name: "RTX 4090".to_string(),
            slug: "rtx-4090".to_string(),
            description: String::new(),
            price: dec!(1999.99),
            stock: 2,
            available: false,
            created_at: created,
            updated_at: created,
            category_id: 4,
            category_name: "GPUs".to_string(),
            category_slug: "gpus".to_string(),
            brand_id: 9,
            brand_name: "Nvidia".to_string(),
            brand_slug: "nvidia".to_string(),
        }
    }

    fn image(id: i64, is_main: bool) -> ProductImage {
        ProductImage {
            id,
            product_id: 1,
            image: format!("products/{}.jpg", id),
            is_main,
        }
    }

    #[test]
    fn test_product_row_without_main_image() {
        let row = product_row(listing(), &[image(3, false), image(4, false)], "/media/");

        assert!(!row.has_main_image);
        assert_eq!(row.image.image_id, Some(3));
        assert_eq!(row.image.width, 50);
        assert_eq!(row.created, "31.01.2025");
        assert_eq!(row.category.name, "GPUs");
        assert!(!row.available);
    }

    #[test]
    fn test_product_form_previews() {
        let form = product_form(listing(), &[image(3, false), image(4, true)], "/media/");

        assert_eq!(form.main_image_preview.image_id, Some(4));
        assert_eq!(form.main_image_preview.width, 200);
        assert_eq!(form.images.len(), 2);
        assert_eq!(form.images[0].preview.width, 100);
        assert!(form.images[1].is_main);
    }

    #[test]
    fn test_product_form_serializes_flat() {
        let form = product_form(listing(), &[], "/media/");
        let json = serde_json::to_value(&form).unwrap();

        assert_eq!(json["slug"], "rtx-4090");
        assert_eq!(json["main_image_preview"]["placeholder"], true);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(dec!(0.00)).is_ok());
        assert!(validate_price(dec!(-1)).is_err());
        assert!(validate_price(dec!(10.999)).is_err());
    }
}
