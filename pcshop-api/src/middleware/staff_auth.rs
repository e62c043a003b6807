/// Staff authentication middleware for the back office
///
/// Every `/admin` route except login sits behind [`require_staff`]. The
/// middleware reads `Authorization: Bearer <token>`, validates the access
/// token, and then reloads the user so that a deactivated or demoted account
/// loses access immediately instead of when its token expires.
///
/// On success a [`StaffIdentity`] is added to the request extensions:
///
/// ```no_run
/// use axum::Extension;
/// use pcshop_api::middleware::staff_auth::StaffIdentity;
///
/// async fn handler(Extension(staff): Extension<StaffIdentity>) -> String {
///     format!("Hello, {}!", staff.username)
/// }
/// ```

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use pcshop_shared::{auth::jwt, models::user::User};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{app::AppState, error::ApiError};

/// Authenticated back-office user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffIdentity {
    pub user_id: i64,
    pub username: String,
    pub is_superuser: bool,
}

/// Rejects requests without a valid staff access token
///
/// # Errors
///
/// - `401 Unauthorized`: header missing, token invalid or expired, user gone
/// - `400 Bad Request`: header is not a Bearer token
/// - `403 Forbidden`: user is no longer active staff
pub async fn require_staff(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;
    let claims = jwt::validate_token(token, state.jwt_secret())?;
    let user_id = claims.user_id()?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    if !user.can_use_backoffice() {
        warn!(user_id, "Back-office access denied for inactive or non-staff user");
        return Err(ApiError::Forbidden(
            "Back-office access requires an active staff account".to_string(),
        ));
    }

    debug!(user_id, username = %user.username, "Staff authenticated");
    req.extensions_mut().insert(StaffIdentity {
        user_id: user.id,
        username: user.username,
        is_superuser: user.is_superuser,
    });

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, CatalogConfig, Config, DatabaseConfig, JwtConfig};
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use pcshop_shared::catalog::stats::SpendPolicy;
    use sqlx::postgres::PgPoolOptions;
    use tower::Service as _;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn state() -> AppState {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production: false,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/pcshop_test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
            },
            catalog: CatalogConfig {
                spend_policy: SpendPolicy::All,
                media_url: "/media/".to_string(),
            },
        };

        // Never connects: every request below is rejected before a query
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        AppState::new(pool, config)
    }

    fn app() -> Router {
        let state = state();
        Router::new()
            .route("/admin/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn_with_state(state.clone(), require_staff))
            .with_state(state)
    }

    async fn status_for(authorization: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri("/admin/ping");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        app()
            .call(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_bad_request() {
        assert_eq!(status_for(Some("Basic YWRtaW46YWRtaW4=")).await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for(Some("Bearer ")).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        assert_eq!(status_for(Some("Bearer not.a.jwt")).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let claims = jwt::Claims::new(1, "admin");
        let token = jwt::create_token(&claims, "another-secret-that-is-32-bytes-long").unwrap();

        let header_value = format!("Bearer {}", token);
        assert_eq!(status_for(Some(&header_value)).await, StatusCode::UNAUTHORIZED);
    }
}
