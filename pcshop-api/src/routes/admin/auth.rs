/// Back-office authentication endpoints
///
/// - `POST /admin/login` - Exchange staff credentials for an access token
/// - `GET /admin/me` - Current staff user
///
/// Tokens are HS256 JWTs valid for 24 hours. There is no refresh flow: staff
/// sign in again when a token expires.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::staff_auth::StaffIdentity,
};
use axum::{extract::State, Extension, Json};
use pcshop_shared::{
    auth::{jwt, password},
    models::user::User,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: i64,

    /// Username
    pub username: String,

    /// Access token (24h)
    pub access_token: String,

    /// Always `Bearer`
    pub token_type: &'static str,

    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Login for staff users
///
/// # Endpoint
///
/// ```text
/// POST /admin/login
/// Content-Type: application/json
///
/// {
///   "username": "admin",
///   "password": "correct horse battery"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing username or password
/// - `401 Unauthorized`: Unknown user, wrong password, or not active staff
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(username = %req.username, "Back-office login failed: wrong password");
        return Err(invalid_credentials());
    }

    if !user.can_use_backoffice() {
        warn!(user_id = user.id, "Back-office login refused for inactive or non-staff user");
        return Err(invalid_credentials());
    }

    User::update_last_login(&state.db, user.id).await?;

    let claims = jwt::Claims::new(user.id, &user.username);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    info!(user_id = user.id, username = %user.username, "Staff logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        access_token,
        token_type: "Bearer",
        expires_in: claims.expires_in(),
    }))
}

/// Returns the authenticated staff user
pub async fn me(Extension(staff): Extension<StaffIdentity>) -> Json<StaffIdentity> {
    Json(staff)
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let req = LoginRequest {
            username: String::new(),
            password: String::new(),
        };
        assert!(req.validate().is_err());

        let req = LoginRequest {
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert_eq!(invalid_credentials().status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
