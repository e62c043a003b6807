/// Category model and database operations
///
/// Categories form a tree through `parent_id`. Deleting a category cascades
/// to its children and to every product filed under any of them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     slug VARCHAR(100) NOT NULL UNIQUE,
///     description TEXT NOT NULL DEFAULT '',
///     image VARCHAR(255),
///     parent_id BIGINT REFERENCES categories(id) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use pcshop_shared::models::category::{Category, CreateCategory};
/// use pcshop_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let laptops = Category::create(&pool, CreateCategory {
///     name: "Laptops".to_string(),
///     slug: "laptops".to_string(),
///     description: String::new(),
///     image: None,
///     parent_id: None,
/// }).await?;
///
/// let tree = Category::load_tree(&pool).await?;
/// let ids = tree.descendants(laptops.id, true);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::filter::blank_as_none;
use crate::catalog::tree::CategoryTree;

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Category ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique URL slug
    pub slug: String,

    /// Free-form description (may be empty)
    pub description: String,

    /// Optional image reference (under `categories/`)
    pub image: Option<String>,

    /// Parent category (None for top-level categories)
    pub parent_id: Option<i64>,
}

/// Input for creating a category
///
/// The slug must already be resolved; see [`crate::backoffice`] for slug
/// derivation on the write path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub parent_id: Option<i64>,
}

/// Input for updating a category
///
/// Only non-None fields are written. Nested options clear the column with
/// `Some(None)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub parent_id: Option<Option<i64>>,
}

/// Filters for the back-office category list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Only direct children of this category
    #[serde(default, deserialize_with = "blank_as_none")]
    pub parent_id: Option<i64>,

    /// Case-insensitive match on name or description
    pub q: Option<String>,
}

impl Category {
    /// Creates a new category
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is taken or the parent does not exist
    pub async fn create(pool: &PgPool, data: CreateCategory) -> Result<Self, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description, image, parent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, slug, description, image, parent_id
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .bind(data.image)
        .bind(data.parent_id)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, image, parent_id
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by its URL slug
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, image, parent_id
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Lists every category, alphabetically
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, image, parent_id
            FROM categories
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Lists categories matching back-office filters
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &CategoryFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = filter.q.as_deref().map(like_pattern);

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, image, parent_id
            FROM categories
            WHERE ($1::bigint IS NULL OR parent_id = $1)
              AND ($2::text IS NULL OR name ILIKE $2 OR description ILIKE $2)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(filter.parent_id)
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Loads the whole parent relation as a [`CategoryTree`]
    pub async fn load_tree(pool: &PgPool) -> Result<CategoryTree, sqlx::Error> {
        let edges: Vec<(i64, Option<i64>)> =
            sqlx::query_as("SELECT id, parent_id FROM categories")
                .fetch_all(pool)
                .await?;

        Ok(CategoryTree::from_edges(edges))
    }

    /// Updates a category
    ///
    /// Only non-None fields are written.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateCategory,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE categories SET id = id");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.slug.is_some() {
            bind_count += 1;
            query.push_str(&format!(", slug = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.image.is_some() {
            bind_count += 1;
            query.push_str(&format!(", image = ${}", bind_count));
        }
        if data.parent_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", parent_id = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, name, slug, description, image, parent_id");

        let mut q = sqlx::query_as::<_, Category>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(slug) = data.slug {
            q = q.bind(slug);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(image) = data.image {
            q = q.bind(image);
        }
        if let Some(parent_id) = data.parent_id {
            q = q.bind(parent_id);
        }

        let category = q.fetch_optional(pool).await?;

        Ok(category)
    }

    /// Deletes a category
    ///
    /// ⚠️  Cascades to child categories and their products.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products filed directly under each category
    ///
    /// Categories without products are absent from the map.
    pub async fn product_counts(pool: &PgPool) -> Result<HashMap<i64, i64>, sqlx::Error> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT category_id, COUNT(*) FROM products GROUP BY category_id",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Counts products filed directly under one category
    pub async fn product_count(pool: &PgPool, id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Whether an image reference is set
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|img| !img.is_empty())
    }
}

/// Wraps a search term for `ILIKE`, escaping wildcard characters
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_category_default() {
        let update = UpdateCategory::default();
        assert!(update.name.is_none());
        assert!(update.slug.is_none());
        assert!(update.parent_id.is_none());
    }

    #[test]
    fn test_has_image() {
        let mut category = Category {
            id: 1,
            name: "Laptops".to_string(),
            slug: "laptops".to_string(),
            description: String::new(),
            image: None,
            parent_id: None,
        };
        assert!(!category.has_image());

        category.image = Some(String::new());
        assert!(!category.has_image());

        category.image = Some("categories/laptops.png".to_string());
        assert!(category.has_image());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rtx"), "%rtx%");
        assert_eq!(like_pattern(" 100% "), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
