/// Public user index
///
/// `GET /users/` lists every user alphabetically by username. Only names
/// are exposed.

use axum::{extract::State, Json};
use pcshop_shared::catalog::query::{self, UserEntry};

use crate::{app::AppState, error::ApiResult};

/// User index handler
pub async fn index(State(state): State<AppState>) -> ApiResult<Json<Vec<UserEntry>>> {
    let users = query::user_index(&state.db).await?;
    Ok(Json(users))
}
