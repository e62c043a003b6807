/// User administration endpoints
///
/// - `GET    /admin/users` - List, newest joined first (`?is_staff=`, `?is_active=`,
///   `?is_superuser=`, `?date_joined=`, `?q=`, `?page=`)
/// - `POST   /admin/users` - Create
/// - `GET    /admin/users/:id` - Detail with purchase history
/// - `PUT    /admin/users/:id` - Update
/// - `DELETE /admin/users/:id` - Delete one user
///
/// Users are deleted one at a time; there is no bulk delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pcshop_shared::{
    backoffice::users::{self, NewUser, UserChanges, UserDetail, UserRow},
    catalog::pagination::Page,
    models::user::UserFilter,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::staff_auth::StaffIdentity,
    routes::PageQuery,
};

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    /// Plaintext; stored as an Argon2id hash
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    #[serde(default)]
    pub last_name: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub is_staff: bool,

    #[serde(default)]
    pub is_superuser: bool,
}

fn default_active() -> bool {
    true
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: Option<String>,

    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Lists users with order statistics
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<Page<UserRow>>> {
    let page = users::list_users(&state.db, state.spend_policy(), &filter, params.page())
    .await?;

    Ok(Json(page))
}

/// Gets one user with purchase history
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserDetail>> {
    Ok(Json(users::get_user(&state.db, state.spend_policy(), id).await?))
}

/// Creates a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserDetail>)> {
    req.validate()?;

    let detail = users::create_user(
        &state.db,
        state.spend_policy(),
        NewUser {
            username: req.username,
            password: req.password,
            email: req.email.unwrap_or_default(),
            first_name: req.first_name,
            last_name: req.last_name,
            is_active: req.is_active,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Updates a user
pub async fn update_user(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserDetail>> {
    req.validate()?;

    // Staff cannot lock themselves out of the back office
    if id == staff.user_id && (req.is_active == Some(false) || req.is_staff == Some(false)) {
        return Err(ApiError::invalid_field(
            "is_staff",
            "You cannot remove your own back-office access",
        ));
    }

    let detail = users::update_user(
        &state.db,
        state.spend_policy(),
        id,
        UserChanges {
            username: req.username,
            password: req.password,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            is_active: req.is_active,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
        },
    )
    .await?;

    Ok(Json(detail))
}

/// Deletes one user and their orders
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if id == staff.user_id {
        return Err(ApiError::Conflict("You cannot delete your own account".to_string()));
    }

    users::delete_user(&state.db, id).await?;
    info!(user_id = id, staff = %staff.username, "User deleted from back office");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"username": "alice", "password": "gpu-hoarder-2024"}"#)
                .unwrap();

        assert!(req.validate().is_ok());
        assert!(req.is_active);
        assert!(!req.is_staff);
        assert!(req.email.is_none());
    }

    #[test]
    fn test_create_request_rejects_bad_email_and_short_password() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"username": "alice", "password": "short", "email": "not-an-email"}"#,
        )
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
    }
}
