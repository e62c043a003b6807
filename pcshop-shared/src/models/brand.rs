/// Brand model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE brands (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(50) NOT NULL,
///     slug VARCHAR(50) NOT NULL UNIQUE,
///     description TEXT NOT NULL DEFAULT ''
/// );
/// ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::like_pattern;

/// Product brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    /// Brand ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique URL slug
    pub slug: String,

    /// Free-form description (may be empty)
    pub description: String,
}

/// Input for creating a brand (slug already resolved)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Input for updating a brand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl Brand {
    /// Creates a new brand
    pub async fn create(pool: &PgPool, data: CreateBrand) -> Result<Self, sqlx::Error> {
        let brand = sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(brand)
    }

    /// Finds a brand by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, slug, description FROM brands WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(brand)
    }

    /// Finds a brand by its URL slug
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, slug, description FROM brands WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(brand)
    }

    /// Lists brands alphabetically, optionally filtered by a search term
    pub async fn list(pool: &PgPool, q: Option<&str>) -> Result<Vec<Self>, sqlx::Error> {
        let brands = sqlx::query_as::<_, Brand>(
            r#"
            SELECT id, name, slug, description
            FROM brands
            WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(q.map(like_pattern))
        .fetch_all(pool)
        .await?;

        Ok(brands)
    }

    /// Updates a brand; fields left as None keep their value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateBrand,
    ) -> Result<Option<Self>, sqlx::Error> {
        let brand = sqlx::query_as::<_, Brand>(
            r#"
            UPDATE brands
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description)
            WHERE id = $1
            RETURNING id, name, slug, description
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(brand)
    }

    /// Deletes a brand
    ///
    /// ⚠️  Cascades to every product of the brand.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products per brand; brands without products are absent
    pub async fn product_counts(pool: &PgPool) -> Result<HashMap<i64, i64>, sqlx::Error> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT brand_id, COUNT(*) FROM products GROUP BY brand_id")
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().collect())
    }

    /// Counts products of one brand
    pub async fn product_count(pool: &PgPool, id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE brand_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
