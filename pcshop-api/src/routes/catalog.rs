/// Storefront endpoints
///
/// ```text
/// GET /                      all available products, newest first
/// GET /category/:slug/       a category and its descendants
/// GET /brand/:slug/          one brand
/// GET /product/:id/:slug/    product detail with related products
/// ```
///
/// Listings are paginated 12 per page with `?page=`. Unknown slugs, a
/// product id/slug pair that doesn't match an available product, and
/// out-of-range pages all answer 404.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use pcshop_shared::catalog::query::{self, ProductDetail, ProductList};

use super::PageQuery;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Home page listing
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<ProductList>> {
    let list = query::list_products(&state.db, state.media_url(), params.page()).await?;
    Ok(Json(list))
}

/// Category listing, including subcategories
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<ProductList>> {
    let list = query::list_by_category(&state.db, state.media_url(), &slug, params.page()).await?;
    Ok(Json(list))
}

/// Brand listing
pub async fn brand(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<ProductList>> {
    let list = query::list_by_brand(&state.db, state.media_url(), &slug, params.page()).await?;
    Ok(Json(list))
}

/// Product detail page
///
/// The id segment is taken as text: anything but a plain decimal number
/// that fits an id is an unknown product.
pub async fn product_detail(
    State(state): State<AppState>,
    Path((id, slug)): Path<(String, String)>,
) -> ApiResult<Json<ProductDetail>> {
    let id = product_id(&id).ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    let detail = query::product_detail(&state.db, state.media_url(), id, &slug).await?;
    Ok(Json(detail))
}

fn product_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_accepts_digits_only() {
        assert_eq!(product_id("42"), Some(42));
        assert_eq!(product_id("007"), Some(7));
        assert_eq!(product_id("abc"), None);
        assert_eq!(product_id("-5"), None);
        assert_eq!(product_id("+5"), None);
        assert_eq!(product_id(""), None);
        assert_eq!(product_id("99999999999999999999"), None);
    }
}
