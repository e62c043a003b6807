/// Product model and database operations
///
/// Every product belongs to exactly one category and one brand and is
/// deleted with either. Listings are newest first. Storefront reads only
/// see `available = true`; back-office reads see everything.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(200) NOT NULL,
///     slug VARCHAR(200) NOT NULL UNIQUE,
///     description TEXT NOT NULL,
///     price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
///     category_id BIGINT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
///     brand_id BIGINT NOT NULL REFERENCES brands(id) ON DELETE CASCADE,
///     stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
///     available BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use pcshop_shared::models::product::{Product, ProductScope};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let scope = ProductScope::brand(3);
/// let total = Product::count_available(&pool, &scope).await?;
/// let first_page = Product::list_available(&pool, &scope, 12, 0).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::like_pattern;
use super::filter::{blank_as_none, since_now, DateRange};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Product ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique URL slug
    pub slug: String,

    pub description: String,

    /// Price with two decimal places, never negative
    pub price: Decimal,

    pub category_id: i64,
    pub brand_id: i64,

    /// Units in stock, never negative
    pub stock: i32,

    /// Whether the storefront shows the product
    pub available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row joined with its category and brand
///
/// Listings are built from this row so that showing the category and brand
/// never costs an extra query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductListing {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_id: i64,
    pub category_name: String,
    pub category_slug: String,
    pub brand_id: i64,
    pub brand_name: String,
    pub brand_slug: String,
}

/// Input for creating a product (slug already resolved)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i64,
    pub brand_id: i64,
    pub stock: i32,
    pub available: bool,
}

/// Input for updating a product
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub stock: Option<i32>,
    pub available: Option<bool>,
}

/// Storefront listing scope
///
/// Both restrictions are optional; an empty scope lists every available
/// product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductScope {
    /// Restrict to these categories (a category subtree)
    pub category_ids: Option<Vec<i64>>,

    /// Restrict to one brand
    pub brand_id: Option<i64>,
}

impl ProductScope {
    /// Every available product
    pub fn all() -> Self {
        Self::default()
    }

    /// Products filed under any of `ids`
    pub fn categories(ids: Vec<i64>) -> Self {
        Self {
            category_ids: Some(ids),
            brand_id: None,
        }
    }

    /// Products of one brand
    pub fn brand(id: i64) -> Self {
        Self {
            category_ids: None,
            brand_id: Some(id),
        }
    }
}

/// Filters for the back-office product list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category_id: Option<i64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub brand_id: Option<i64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub available: Option<bool>,

    /// Created within this window
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created: Option<DateRange>,

    /// Last updated within this window
    #[serde(default, deserialize_with = "blank_as_none")]
    pub updated: Option<DateRange>,

    /// Case-insensitive match on product name, description, category name
    /// or brand name
    pub q: Option<String>,
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, category_id, brand_id, \
                               stock, available, created_at, updated_at";

const LISTING_SELECT: &str = r#"
    SELECT p.id, p.name, p.slug, p.description, p.price, p.stock, p.available,
           p.created_at, p.updated_at,
           c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
           b.id AS brand_id, b.name AS brand_name, b.slug AS brand_slug
    FROM products p
    JOIN categories c ON c.id = p.category_id
    JOIN brands b ON b.id = p.brand_id
"#;

const SCOPE_WHERE: &str = r#"
    WHERE p.available
      AND ($1::bigint[] IS NULL OR p.category_id = ANY($1))
      AND ($2::bigint IS NULL OR p.brand_id = $2)
"#;

const ADMIN_WHERE: &str = r#"
    WHERE ($1::bigint IS NULL OR p.category_id = $1)
      AND ($2::bigint IS NULL OR p.brand_id = $2)
      AND ($3::boolean IS NULL OR p.available = $3)
      AND ($4::text IS NULL
           OR p.name ILIKE $4 OR p.description ILIKE $4
           OR c.name ILIKE $4 OR b.name ILIKE $4)
      AND ($5::timestamptz IS NULL OR p.created_at >= $5)
      AND ($6::timestamptz IS NULL OR p.updated_at >= $6)
"#;

impl Product {
    /// Creates a new product
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is taken, the category or brand does not
    /// exist, or a `CHECK` constraint fails
    pub async fn create(pool: &PgPool, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, slug, description, price, category_id, brand_id,
                                  stock, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .bind(data.price)
        .bind(data.category_id)
        .bind(data.brand_id)
        .bind(data.stock)
        .bind(data.available)
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Finds a product by ID, available or not
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Loads the products with the given IDs, in ID order
    ///
    /// Unknown IDs are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ANY($1) ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Lists available products in `scope`, newest first
    pub async fn list_available(
        pool: &PgPool,
        scope: &ProductScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductListing>, sqlx::Error> {
        let query = format!(
            "{}{} ORDER BY p.created_at DESC, p.id DESC LIMIT $3 OFFSET $4",
            LISTING_SELECT, SCOPE_WHERE
        );

        let products = sqlx::query_as::<_, ProductListing>(&query)
            .bind(scope.category_ids.clone())
            .bind(scope.brand_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(products)
    }

    /// Counts available products in `scope`
    pub async fn count_available(pool: &PgPool, scope: &ProductScope) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM products p{}", SCOPE_WHERE);

        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(scope.category_ids.clone())
            .bind(scope.brand_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Finds the available product matching both `id` and `slug`
    pub async fn find_available_listing(
        pool: &PgPool,
        id: i64,
        slug: &str,
    ) -> Result<Option<ProductListing>, sqlx::Error> {
        let query = format!(
            "{} WHERE p.id = $1 AND p.slug = $2 AND p.available",
            LISTING_SELECT
        );

        let product = sqlx::query_as::<_, ProductListing>(&query)
            .bind(id)
            .bind(slug)
            .fetch_optional(pool)
            .await?;

        Ok(product)
    }

    /// Finds any product with its category and brand, for the back office
    pub async fn find_listing(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<ProductListing>, sqlx::Error> {
        let query = format!("{} WHERE p.id = $1", LISTING_SELECT);

        let product = sqlx::query_as::<_, ProductListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(product)
    }

    /// Other available products from the same category, newest first
    pub async fn related(
        pool: &PgPool,
        product_id: i64,
        category_id: i64,
        limit: i64,
    ) -> Result<Vec<ProductListing>, sqlx::Error> {
        let query = format!(
            r#"{}
            WHERE p.category_id = $1 AND p.id <> $2 AND p.available
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $3
            "#,
            LISTING_SELECT
        );

        let products = sqlx::query_as::<_, ProductListing>(&query)
            .bind(category_id)
            .bind(product_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(products)
    }

    /// Writes every editable column of `self` back to its row
    ///
    /// This is the plain model save: it refreshes `updated_at` and nothing
    /// else. Back-office follow-up steps are not run here.
    pub async fn save(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, slug = $3, description = $4, price = $5,
                category_id = $6, brand_id = $7, stock = $8, available = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.slug)
        .bind(&self.description)
        .bind(self.price)
        .bind(self.category_id)
        .bind(self.brand_id)
        .bind(self.stock)
        .bind(self.available)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Updates a product; fields left as None keep their value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                category_id = COALESCE($6, category_id),
                brand_id = COALESCE($7, brand_id),
                stock = COALESCE($8, stock),
                available = COALESCE($9, available),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .bind(data.price)
        .bind(data.category_id)
        .bind(data.brand_id)
        .bind(data.stock)
        .bind(data.available)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Deletes a product and, by cascade, its images
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets the available flag on many products in one statement
    ///
    /// Returns the number of rows changed. Does not refresh `updated_at` and
    /// runs no per-row follow-up.
    pub async fn set_available(
        pool: &PgPool,
        ids: &[i64],
        available: bool,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("UPDATE products SET available = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(available)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Lists products for the back office, newest first
    pub async fn list_admin(
        pool: &PgPool,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductListing>, sqlx::Error> {
        let query = format!(
            "{}{} ORDER BY p.created_at DESC, p.id DESC LIMIT $7 OFFSET $8",
            LISTING_SELECT, ADMIN_WHERE
        );

        let products = sqlx::query_as::<_, ProductListing>(&query)
            .bind(filter.category_id)
            .bind(filter.brand_id)
            .bind(filter.available)
            .bind(filter.q.as_deref().map(like_pattern))
            .bind(since_now(filter.created))
            .bind(since_now(filter.updated))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(products)
    }

    /// Counts products matching back-office filters
    pub async fn count_admin(pool: &PgPool, filter: &ProductFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            r#"
            SELECT COUNT(*)
            FROM products p
            JOIN categories c ON c.id = p.category_id
            JOIN brands b ON b.id = p.brand_id
            {}
            "#,
            ADMIN_WHERE
        );

        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.category_id)
            .bind(filter.brand_id)
            .bind(filter.available)
            .bind(filter.q.as_deref().map(like_pattern))
            .bind(since_now(filter.created))
            .bind(since_now(filter.updated))
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
