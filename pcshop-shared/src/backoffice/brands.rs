//! Brand administration

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use super::{products_url, resolve_slug};
use crate::error::{CatalogError, CatalogResult};
use crate::models::brand::{Brand, CreateBrand, UpdateBrand};

const SLUG_MAX_LEN: usize = 50;

/// Brand as listed in the back office
#[derive(Debug, Clone, Serialize)]
pub struct BrandRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub product_count: i64,
    pub products_url: String,
}

impl BrandRow {
    fn new(brand: Brand, product_count: i64) -> Self {
        Self {
            products_url: products_url("brand_id", brand.id),
            id: brand.id,
            name: brand.name,
            slug: brand.slug,
            description: brand.description,
            product_count,
        }
    }
}

/// New brand; a blank slug is derived from the name
#[derive(Debug, Clone, Default)]
pub struct NewBrand {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
}

/// Brand edits; a blank `slug` is re-derived from the name
#[derive(Debug, Clone, Default)]
pub struct BrandChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Lists brands with their product counts
pub async fn list_brands(pool: &PgPool, q: Option<&str>) -> CatalogResult<Vec<BrandRow>> {
    let brands = Brand::list(pool, q).await?;
    let counts = Brand::product_counts(pool).await?;

    Ok(brands
        .into_iter()
        .map(|brand| {
            let count = counts.get(&brand.id).copied().unwrap_or(0);
            BrandRow::new(brand, count)
        })
        .collect())
}

/// Loads one brand with its product count
pub async fn get_brand(pool: &PgPool, id: i64) -> CatalogResult<BrandRow> {
    let brand = Brand::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Brand"))?;
    let count = Brand::product_count(pool, id).await?;

    Ok(BrandRow::new(brand, count))
}

/// Creates a brand
pub async fn create_brand(pool: &PgPool, input: NewBrand) -> CatalogResult<BrandRow> {
    let slug = resolve_slug(input.slug.as_deref(), &input.name, SLUG_MAX_LEN)?;

    let brand = Brand::create(
        pool,
        CreateBrand {
            name: input.name,
            slug,
            description: input.description,
        },
    )
    .await?;

    info!(brand_id = brand.id, slug = %brand.slug, "Brand created");
    Ok(BrandRow::new(brand, 0))
}

/// Applies edits to a brand
pub async fn update_brand(pool: &PgPool, id: i64, changes: BrandChanges) -> CatalogResult<BrandRow> {
    let slug = match changes.slug.as_deref() {
        Some(explicit) => {
            let name = match changes.name.as_deref() {
                Some(name) => name.to_string(),
                None => {
                    Brand::find_by_id(pool, id)
                        .await?
                        .ok_or_else(|| CatalogError::not_found("Brand"))?
                        .name
                }
            };
            Some(resolve_slug(Some(explicit), &name, SLUG_MAX_LEN)?)
        }
        None => None,
    };

    let brand = Brand::update(
        pool,
        id,
        UpdateBrand {
            name: changes.name,
            slug,
            description: changes.description,
        },
    )
    .await?
    .ok_or_else(|| CatalogError::not_found("Brand"))?;

    let count = Brand::product_count(pool, id).await?;
    Ok(BrandRow::new(brand, count))
}

/// Deletes a brand and, by cascade, its products
pub async fn delete_brand(pool: &PgPool, id: i64) -> CatalogResult<()> {
    if !Brand::delete(pool, id).await? {
        return Err(CatalogError::not_found("Brand"));
    }

    info!(brand_id = id, "Brand deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_row_links_to_filtered_products() {
        let row = BrandRow::new(
            Brand {
                id: 8,
                name: "MSI".to_string(),
                slug: "msi".to_string(),
                description: String::new(),
            },
            0,
        );

        assert_eq!(row.products_url, "/admin/products?brand_id=8");
        assert_eq!(row.product_count, 0);
    }
}
