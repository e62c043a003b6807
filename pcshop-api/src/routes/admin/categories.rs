/// Category administration endpoints
///
/// - `GET    /admin/categories` - List (`?q=`, `?parent_id=`)
/// - `POST   /admin/categories` - Create
/// - `GET    /admin/categories/:id` - Get
/// - `PUT    /admin/categories/:id` - Update
/// - `DELETE /admin/categories/:id` - Delete with subcategories and products

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pcshop_shared::{
    backoffice::categories::{self, CategoryChanges, CategoryRow, NewCategory},
    models::category::CategoryFilter,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::double_option;
use crate::{app::AppState, error::ApiResult, middleware::staff_auth::StaffIdentity};

/// Create category request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Derived from the name when absent or blank
    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    #[validate(length(max = 255, message = "Image path must be at most 255 characters"))]
    pub image: Option<String>,

    pub parent_id: Option<i64>,
}

/// Update category request
///
/// `parent_id: null` moves the category to the top level; `image: null`
/// removes its image.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
}

/// Lists categories with product counts
pub async fn list_categories(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> ApiResult<Json<Vec<CategoryRow>>> {
    let rows = categories::list_categories(&state.db, &filter).await?;
    Ok(Json(rows))
}

/// Gets one category
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CategoryRow>> {
    Ok(Json(categories::get_category(&state.db, id).await?))
}

/// Creates a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryRow>)> {
    req.validate()?;

    let row = categories::create_category(
        &state.db,
        NewCategory {
            name: req.name,
            slug: req.slug,
            description: req.description,
            image: req.image,
            parent_id: req.parent_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Updates a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<CategoryRow>> {
    req.validate()?;

    let row = categories::update_category(
        &state.db,
        id,
        CategoryChanges {
            name: req.name,
            slug: req.slug,
            description: req.description,
            image: req.image,
            parent_id: req.parent_id,
        },
    )
    .await?;

    Ok(Json(row))
}

/// Deletes a category
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    categories::delete_category(&state.db, id).await?;
    info!(category_id = id, staff = %staff.username, "Category deleted from back office");
    Ok(StatusCode::NO_CONTENT)
}
