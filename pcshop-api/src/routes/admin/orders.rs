/// Order administration endpoints
///
/// - `GET  /admin/orders` - List, newest first (`?user_id=`, `?paid=`, `?status=`,
///   `?created=`, `?q=`, `?page=`)
/// - `POST /admin/orders` - Create
/// - `GET  /admin/orders/:id` - Get
/// - `PUT  /admin/orders/:id` - Update owner, total, paid flag or status

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use pcshop_shared::{
    backoffice::orders::{self, OrderRow},
    catalog::pagination::Page,
    models::order::{CreateOrder, Order, OrderFilter, UpdateOrder},
};

use crate::{app::AppState, error::ApiResult, routes::PageQuery};

/// Lists orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<Page<OrderRow>>> {
    Ok(Json(orders::list_orders(&state.db, &filter, params.page()).await?))
}

/// Gets one order
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::get_order(&state.db, id).await?))
}

/// Creates an order
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = orders::create_order(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Updates an order
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrder>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::update_order(&state.db, id, req).await?))
}
