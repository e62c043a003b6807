/// Product administration endpoints
///
/// - `GET    /admin/products` - List, 50 per page (`?category_id=`, `?brand_id=`, `?available=`,
///   `?created=`, `?updated=`, `?q=`, `?page=`); dates take `today`, `past_7_days`,
///   `this_month` or `this_year`
/// - `POST   /admin/products` - Create
/// - `GET    /admin/products/:id` - Edit form with image previews
/// - `PUT    /admin/products/:id` - Update (also used for inline price/stock/available edits)
/// - `DELETE /admin/products/:id` - Delete
/// - `POST   /admin/products/actions` - Bulk action over selected ids
/// - `POST   /admin/products/:id/images` - Attach image
/// - `PUT    /admin/products/:id/images/:image_id` - Edit image
/// - `DELETE /admin/products/:id/images/:image_id` - Remove image

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pcshop_shared::{
    backoffice::products::{self, NewImage, NewProduct, ProductChanges, ProductForm, ProductRow},
    catalog::pagination::Page,
    models::{product::ProductFilter, product_image::UpdateProductImage},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::ActionResult;
use crate::{
    app::AppState, error::ApiResult, middleware::staff_auth::StaffIdentity, routes::PageQuery,
};

/// Create product request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Derived from the name when absent or blank
    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Accepts a JSON string or number, e.g. `"1299.99"`
    pub price: Decimal,

    pub category_id: i64,
    pub brand_id: i64,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[serde(default)]
    pub stock: i32,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Update product request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i32>,

    pub available: Option<bool>,
}

/// Bulk actions on the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAction {
    /// Set `available = true`
    MarkAvailable,

    /// Set `available = false`
    MarkUnavailable,

    /// Multiply the price by 1.10
    IncreasePriceBy10Percent,
}

impl ProductAction {
    /// Action name as sent by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductAction::MarkAvailable => "mark_available",
            ProductAction::MarkUnavailable => "mark_unavailable",
            ProductAction::IncreasePriceBy10Percent => "increase_price_by_10_percent",
        }
    }
}

/// Bulk action request
#[derive(Debug, Deserialize, Validate)]
pub struct ProductActionRequest {
    pub action: ProductAction,

    #[validate(length(min = 1, message = "Select at least one product"))]
    pub ids: Vec<i64>,
}

/// Attach image request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateImageRequest {
    #[validate(length(min = 1, max = 255, message = "Image path must be 1-255 characters"))]
    pub image: String,

    #[serde(default)]
    pub is_main: bool,
}

/// Edit image request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateImageRequest {
    #[validate(length(min = 1, max = 255, message = "Image path must be 1-255 characters"))]
    pub image: Option<String>,

    pub is_main: Option<bool>,
}

/// Lists products for the back office
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<Page<ProductRow>>> {
    let page = products::list_products(&state.db, state.media_url(), &filter, params.page()).await?;
    Ok(Json(page))
}

/// Gets the edit form for one product
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductForm>> {
    Ok(Json(products::get_product(&state.db, state.media_url(), id).await?))
}

/// Creates a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductForm>)> {
    req.validate()?;

    let form = products::create_product(
        &state.db,
        state.media_url(),
        NewProduct {
            name: req.name,
            slug: req.slug,
            description: req.description,
            price: req.price,
            category_id: req.category_id,
            brand_id: req.brand_id,
            stock: req.stock,
            available: req.available,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(form)))
}

/// Updates a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<ProductForm>> {
    req.validate()?;

    let form = products::update_product(
        &state.db,
        state.media_url(),
        id,
        ProductChanges {
            name: req.name,
            slug: req.slug,
            description: req.description,
            price: req.price,
            category_id: req.category_id,
            brand_id: req.brand_id,
            stock: req.stock,
            available: req.available,
        },
    )
    .await?;

    Ok(Json(form))
}

/// Deletes a product
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    products::delete_product(&state.db, id).await?;
    info!(product_id = id, staff = %staff.username, "Product deleted from back office");
    Ok(StatusCode::NO_CONTENT)
}

/// Runs a bulk action over the selected products
///
/// ```text
/// POST /admin/products/actions
///
/// { "action": "increase_price_by_10_percent", "ids": [3, 8, 21] }
/// ```
pub async fn run_action(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Json(req): Json<ProductActionRequest>,
) -> ApiResult<Json<ActionResult>> {
    req.validate()?;

    let updated = match req.action {
        ProductAction::MarkAvailable => products::mark_available(&state.db, &req.ids, true).await?,
        ProductAction::MarkUnavailable => {
            products::mark_available(&state.db, &req.ids, false).await?
        }
        ProductAction::IncreasePriceBy10Percent => {
            products::increase_price_by_10_percent(&state.db, &req.ids).await?
        }
    };

    info!(
        action = req.action.as_str(),
        selected = req.ids.len(),
        updated,
        staff = %staff.username,
        "Bulk product action"
    );

    Ok(Json(ActionResult {
        action: req.action.as_str().to_string(),
        selected: req.ids.len(),
        updated,
    }))
}

/// Attaches an image to a product
pub async fn add_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateImageRequest>,
) -> ApiResult<(StatusCode, Json<ProductForm>)> {
    req.validate()?;

    let form = products::add_image(
        &state.db,
        state.media_url(),
        id,
        NewImage {
            image: req.image,
            is_main: req.is_main,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(form)))
}

/// Edits an image
pub async fn update_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateImageRequest>,
) -> ApiResult<Json<ProductForm>> {
    req.validate()?;

    let form = products::update_image(
        &state.db,
        state.media_url(),
        id,
        image_id,
        UpdateProductImage {
            image: req.image,
            is_main: req.is_main,
        },
    )
    .await?;

    Ok(Json(form))
}

/// Removes an image
pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(i64, i64)>,
) -> ApiResult<Json<ProductForm>> {
    Ok(Json(
        products::delete_image(&state.db, state.media_url(), id, image_id).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_action_request_parsing() {
        let req: ProductActionRequest = serde_json::from_str(
            r#"{"action": "increase_price_by_10_percent", "ids": [1, 2]}"#,
        )
        .unwrap();

        assert_eq!(req.action, ProductAction::IncreasePriceBy10Percent);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_action_request_needs_selection() {
        let req: ProductActionRequest =
            serde_json::from_str(r#"{"action": "mark_available", "ids": []}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let req = serde_json::from_str::<ProductActionRequest>(
            r#"{"action": "delete_selected", "ids": [1]}"#,
        );
        assert!(req.is_err());
    }

    #[test]
    fn test_create_request_defaults_and_price_formats() {
        let req: CreateProductRequest = serde_json::from_str(
            r#"{"name": "RTX 4090", "price": "1999.99", "category_id": 1, "brand_id": 2}"#,
        )
        .unwrap();

        assert_eq!(req.price, dec!(1999.99));
        assert_eq!(req.stock, 0);
        assert!(req.available);
        assert!(req.slug.is_none());

        let req: CreateProductRequest = serde_json::from_str(
            r#"{"name": "Mouse", "price": 19.5, "category_id": 1, "brand_id": 2, "stock": -3}"#,
        )
        .unwrap();

        assert_eq!(req.price, dec!(19.5));
        assert!(req.validate().is_err());
    }
}
