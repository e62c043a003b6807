/// Brand administration endpoints
///
/// - `GET    /admin/brands` - List (`?q=`)
/// - `POST   /admin/brands` - Create
/// - `GET    /admin/brands/:id` - Get
/// - `PUT    /admin/brands/:id` - Update
/// - `DELETE /admin/brands/:id` - Delete with its products

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pcshop_shared::backoffice::brands::{self, BrandChanges, BrandRow, NewBrand};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::SearchQuery;
use crate::{app::AppState, error::ApiResult, middleware::staff_auth::StaffIdentity};

/// Create brand request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBrandRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    /// Derived from the name when absent or blank
    #[validate(length(max = 50, message = "Slug must be at most 50 characters"))]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,
}

/// Update brand request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrandRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 50, message = "Slug must be at most 50 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,
}

/// Lists brands with product counts
pub async fn list_brands(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> ApiResult<Json<Vec<BrandRow>>> {
    Ok(Json(brands::list_brands(&state.db, search.term()).await?))
}

/// Gets one brand
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BrandRow>> {
    Ok(Json(brands::get_brand(&state.db, id).await?))
}

/// Creates a brand
pub async fn create_brand(
    State(state): State<AppState>,
    Json(req): Json<CreateBrandRequest>,
) -> ApiResult<(StatusCode, Json<BrandRow>)> {
    req.validate()?;

    let row = brands::create_brand(
        &state.db,
        NewBrand {
            name: req.name,
            slug: req.slug,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Updates a brand
pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBrandRequest>,
) -> ApiResult<Json<BrandRow>> {
    req.validate()?;

    let row = brands::update_brand(
        &state.db,
        id,
        BrandChanges {
            name: req.name,
            slug: req.slug,
            description: req.description,
        },
    )
    .await?;

    Ok(Json(row))
}

/// Deletes a brand
pub async fn delete_brand(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    brands::delete_brand(&state.db, id).await?;
    info!(brand_id = id, staff = %staff.username, "Brand deleted from back office");
    Ok(StatusCode::NO_CONTENT)
}
