/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use pcshop_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = pcshop_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeaders, staff_auth::require_staff},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use pcshop_shared::catalog::stats::SpendPolicy;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Prefix for image URLs
    pub fn media_url(&self) -> &str {
        &self.config.catalog.media_url
    }

    /// Which orders count toward `total_spent`
    pub fn spend_policy(&self) -> SpendPolicy {
        self.config.catalog.spend_policy
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                                # Storefront: all products
/// ├── GET  /product/:id/:slug/              # Storefront: product detail
/// ├── GET  /category/:slug/                 # Storefront: category subtree
/// ├── GET  /brand/:slug/                    # Storefront: brand
/// ├── GET  /users/                          # User index
/// ├── GET  /health                          # Health check
/// └── /admin/
///     ├── POST /login                       # Staff token (public)
///     ├── GET  /me                          # Current staff user
///     ├── /categories[/:id]                 # Category CRUD
///     ├── /brands[/:id]                     # Brand CRUD
///     ├── /products[/:id]                   # Product CRUD
///     ├── POST /products/actions            # Bulk actions
///     ├── /products/:id/images[/:image_id]  # Inline images
///     ├── /users[/:id]                      # User CRUD with statistics
///     └── /orders[/:id]                     # Order admin
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Staff authentication (`/admin` except login)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers (tower-http SetResponseHeaderLayer, one per header)
pub fn build_router(state: AppState) -> Router {
    let storefront_routes = Router::new()
        .route("/", get(routes::catalog::index))
        .route("/product/:id/:slug/", get(routes::catalog::product_detail))
        .route("/category/:slug/", get(routes::catalog::category))
        .route("/brand/:slug/", get(routes::catalog::brand))
        .route("/users/", get(routes::users::index))
        .route("/health", get(routes::health::health_check));

    let admin_routes = routes::admin::router().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_staff,
    ));

    let admin = Router::new()
        .route("/login", post(routes::admin::auth::login))
        .merge(admin_routes);

    let router = Router::new()
        .merge(storefront_routes)
        .nest("/admin", admin)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config));

    SecurityHeaders::from_config(&state.config)
        .apply(router)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
