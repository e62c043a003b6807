//! Category administration

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use super::{products_url, resolve_slug};
use crate::error::{CatalogError, CatalogResult};
use crate::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};

const SLUG_MAX_LEN: usize = 100;

/// Category as listed in the back office
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub has_image: bool,

    /// Parent category ID
    pub parent: Option<i64>,

    /// Products filed directly under this category
    pub product_count: i64,

    /// Product list filtered to this category
    pub products_url: String,
}

impl CategoryRow {
    fn new(category: Category, product_count: i64) -> Self {
        Self {
            has_image: category.has_image(),
            products_url: products_url("category_id", category.id),
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            image: category.image,
            parent: category.parent_id,
            product_count,
        }
    }
}

/// New category; a blank slug is derived from the name
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub image: Option<String>,
    pub parent_id: Option<i64>,
}

/// Category edits
///
/// `parent_id: Some(None)` detaches the category. A blank `slug` is
/// re-derived from the (possibly new) name.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub parent_id: Option<Option<i64>>,
}

/// Lists categories with their product counts
pub async fn list_categories(
    pool: &PgPool,
    filter: &CategoryFilter,
) -> CatalogResult<Vec<CategoryRow>> {
    let categories = Category::list_filtered(pool, filter).await?;
    let counts = Category::product_counts(pool).await?;

    Ok(categories
        .into_iter()
        .map(|category| {
            let count = counts.get(&category.id).copied().unwrap_or(0);
            CategoryRow::new(category, count)
        })
        .collect())
}

/// Loads one category with its product count
pub async fn get_category(pool: &PgPool, id: i64) -> CatalogResult<CategoryRow> {
    let category = Category::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Category"))?;
    let count = Category::product_count(pool, id).await?;

    Ok(CategoryRow::new(category, count))
}

/// Creates a category
///
/// # Errors
///
/// [`CatalogError::Validation`] for an unusable slug or an unknown parent
pub async fn create_category(pool: &PgPool, input: NewCategory) -> CatalogResult<CategoryRow> {
    let slug = resolve_slug(input.slug.as_deref(), &input.name, SLUG_MAX_LEN)?;

    if let Some(parent_id) = input.parent_id {
        ensure_parent_exists(pool, parent_id).await?;
    }

    let category = Category::create(
        pool,
        CreateCategory {
            name: input.name,
            slug,
            description: input.description,
            image: input.image,
            parent_id: input.parent_id,
        },
    )
    .await?;

    info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok(CategoryRow::new(category, 0))
}

/// Applies edits to a category
///
/// # Errors
///
/// [`CatalogError::Validation`] if the new parent would make the category
/// its own ancestor, or for an unusable slug
pub async fn update_category(
    pool: &PgPool,
    id: i64,
    changes: CategoryChanges,
) -> CatalogResult<CategoryRow> {
    let current = Category::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Category"))?;

    if let Some(Some(parent_id)) = changes.parent_id {
        ensure_parent_exists(pool, parent_id).await?;

        let tree = Category::load_tree(pool).await?;
        if tree.would_create_cycle(id, Some(parent_id)) {
            return Err(CatalogError::validation(
                "parent_id",
                "a category cannot be placed under itself or one of its subcategories",
            ));
        }
    }

    let slug = match changes.slug.as_deref() {
        Some(explicit) => {
            let name = changes.name.as_deref().unwrap_or(&current.name);
            Some(resolve_slug(Some(explicit), name, SLUG_MAX_LEN)?)
        }
        None => None,
    };

    let category = Category::update(
        pool,
        id,
        UpdateCategory {
            name: changes.name,
            slug,
            description: changes.description,
            image: changes.image,
            parent_id: changes.parent_id,
        },
    )
    .await?
    .ok_or_else(|| CatalogError::not_found("Category"))?;

    let count = Category::product_count(pool, id).await?;
    Ok(CategoryRow::new(category, count))
}

/// Deletes a category together with its subcategories and their products
pub async fn delete_category(pool: &PgPool, id: i64) -> CatalogResult<()> {
    if !Category::delete(pool, id).await? {
        return Err(CatalogError::not_found("Category"));
    }

    info!(category_id = id, "Category deleted");
    Ok(())
}

async fn ensure_parent_exists(pool: &PgPool, parent_id: i64) -> CatalogResult<()> {
    match Category::find_by_id(pool, parent_id).await? {
        Some(_) => Ok(()),
        None => Err(CatalogError::validation(
            "parent_id",
            format!("category {} does not exist", parent_id),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_row_computed_columns() {
        let row = CategoryRow::new(
            Category {
                id: 3,
                name: "Monitors".to_string(),
                slug: "monitors".to_string(),
                description: String::new(),
                image: Some("categories/monitors.png".to_string()),
                parent_id: Some(1),
            },
            12,
        );

        assert!(row.has_image);
        assert_eq!(row.parent, Some(1));
        assert_eq!(row.product_count, 12);
        assert_eq!(row.products_url, "/admin/products?category_id=3");
    }
}
