//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::common::JwtService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    approve_deal, approve_retailer, approved_retailers, create_category, create_deal,
    create_retailer, dashboard_metrics, delete_category, delete_retailer, flagged_deals,
    health_handler, list_categories, pending_retailers, recently_cleared_deals, reject_deal,
    reject_retailer, rejected_retailers, submit_deal, submit_retailer_application,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router.
///
/// All `/api` routes pass through the JWT middleware, which attaches an
/// `AuthUser` when a valid token is present. Handlers decide whether the
/// caller must be an admin.
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    allowed_origins: Vec<String>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
    };

    // CORS: explicit origin list when configured, otherwise open (development)
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    };

    let api = Router::new()
        // Retailer applications
        .route("/retailers", post(create_retailer))
        .route("/retailers/apply", post(submit_retailer_application))
        .route("/retailers/pending", get(pending_retailers))
        .route("/retailers/approved", get(approved_retailers))
        .route("/retailers/rejected", get(rejected_retailers))
        .route("/retailers/:id", delete(delete_retailer))
        .route("/retailers/:id/approve", post(approve_retailer))
        .route("/retailers/:id/reject", post(reject_retailer))
        // Deals
        .route("/deals", post(create_deal))
        .route("/deals/submit", post(submit_deal))
        .route("/deals/flagged", get(flagged_deals))
        .route("/deals/cleared", get(recently_cleared_deals))
        .route("/deals/:id/approve", post(approve_deal))
        .route("/deals/:id/reject", post(reject_deal))
        // Categories
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", delete(delete_category))
        // Dashboard
        .route("/dashboard/metrics", get(dashboard_metrics));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            jwt_auth_middleware,
        ))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
