/// Product image model and database operations
///
/// Each product owns an ordered list of images; insertion order is ascending
/// `id`. One image is meant to carry `is_main = true`, but nothing in the
/// schema enforces that. See [`crate::catalog::display`] for how the display
/// image is chosen and [`crate::backoffice`] for the repair step.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE product_images (
///     id BIGSERIAL PRIMARY KEY,
///     product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
///     image VARCHAR(255) NOT NULL,
///     is_main BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Image attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductImage {
    /// Image ID (also defines insertion order)
    pub id: i64,

    /// Owning product
    pub product_id: i64,

    /// Asset reference relative to the media root (e.g. `products/rtx4090.jpg`)
    pub image: String,

    /// Whether this is the product's main image
    pub is_main: bool,
}

/// Input for attaching an image to a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductImage {
    /// Owning product
    pub product_id: i64,

    /// Asset reference
    pub image: String,

    /// Main image flag
    #[serde(default)]
    pub is_main: bool,
}

/// Input for editing an image in place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductImage {
    /// New asset reference
    pub image: Option<String>,

    /// New main image flag
    pub is_main: Option<bool>,
}

impl ProductImage {
    /// Attaches a new image to a product
    pub async fn create(pool: &PgPool, data: CreateProductImage) -> Result<Self, sqlx::Error> {
        let image = sqlx::query_as::<_, ProductImage>(
            r#"
            INSERT INTO product_images (product_id, image, is_main)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, image, is_main
            "#,
        )
        .bind(data.product_id)
        .bind(data.image)
        .bind(data.is_main)
        .fetch_one(pool)
        .await?;

        Ok(image)
    }

    /// Lists a product's images in insertion order
    pub async fn list_for_product(pool: &PgPool, product_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let images = sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT id, product_id, image, is_main
            FROM product_images
            WHERE product_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(pool)
        .await?;

        Ok(images)
    }

    /// Lists images for a batch of products in one query
    ///
    /// Rows are ordered by product, then insertion order, so callers can group
    /// them without re-sorting.
    pub async fn list_for_products(
        pool: &PgPool,
        product_ids: &[i64],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let images = sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT id, product_id, image, is_main
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY product_id ASC, id ASC
            "#,
        )
        .bind(product_ids)
        .fetch_all(pool)
        .await?;

        Ok(images)
    }

    /// Updates an image, scoped to its product
    pub async fn update(
        pool: &PgPool,
        product_id: i64,
        id: i64,
        data: UpdateProductImage,
    ) -> Result<Option<Self>, sqlx::Error> {
        let image = sqlx::query_as::<_, ProductImage>(
            r#"
            UPDATE product_images
            SET image = COALESCE($3, image),
                is_main = COALESCE($4, is_main)
            WHERE id = $1 AND product_id = $2
            RETURNING id, product_id, image, is_main
            "#,
        )
        .bind(id)
        .bind(product_id)
        .bind(data.image)
        .bind(data.is_main)
        .fetch_optional(pool)
        .await?;

        Ok(image)
    }

    /// Flags a single image as main
    pub async fn mark_main(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE product_images SET is_main = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clears the main flag on every image of a product except `keep_id`
    ///
    /// Returns the number of images demoted.
    pub async fn demote_others(
        pool: &PgPool,
        product_id: i64,
        keep_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE product_images
            SET is_main = FALSE
            WHERE product_id = $1 AND id <> $2 AND is_main
            "#,
        )
        .bind(product_id)
        .bind(keep_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes an image, scoped to its product
    pub async fn delete(pool: &PgPool, product_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_images WHERE id = $1 AND product_id = $2")
            .bind(id)
            .bind(product_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_product_image_default() {
        let update = UpdateProductImage::default();
        assert!(update.image.is_none());
        assert!(update.is_main.is_none());
    }

    #[test]
    fn test_create_product_image_main_defaults_to_false() {
        let data: CreateProductImage =
            serde_json::from_str(r#"{"product_id": 1, "image": "products/a.jpg"}"#).unwrap();
        assert!(!data.is_main);
    }
}
