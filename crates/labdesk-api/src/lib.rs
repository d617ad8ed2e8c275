//! labdesk-api
//!
//! HTTP surface of the lab-test booking service: accounts, prescription
//! analysis, orders, and static access to uploaded prescriptions.

pub mod accounts;
pub mod booking;
pub mod config;
pub mod error;
pub mod extractors;
pub mod intake;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::intake::UPLOADS_ROUTE;
use crate::state::AppState;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid CORS_ORIGIN, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let uploads = ServeDir::new(state.booking.intake().dir());

    Router::new()
        // Health
        .route("/", get(routes::health::health_check))
        .route("/health", get(routes::health::health_check))
        // Accounts
        .route("/register", post(routes::accounts::register))
        .route("/login", post(routes::accounts::login))
        .route("/account", post(routes::accounts::account))
        .route("/update-profile", post(routes::accounts::update_profile))
        // Orders
        .route("/api/orders", post(routes::orders::place_order))
        .route(
            "/api/orders/upload-prescription",
            post(routes::orders::upload_prescription),
        )
        .route(
            "/api/orders/ocr-preview",
            post(routes::orders::upload_prescription),
        )
        .route(
            "/api/orders/by-email/{email}",
            get(routes::orders::list_by_email),
        )
        .route(
            "/api/orders/by-email/",
            get(routes::orders::list_without_email),
        )
        // Uploaded prescriptions
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(DefaultBodyLimit::max(config.body_limit()))
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors_layer(config.cors_origin.as_deref()))
        .with_state(state)
}
