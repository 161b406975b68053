// Library root - shared by the server binary, the seeder and the tests

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use database::{PageViewRepository, SharedPageViewStore};
pub use error::{ApiError, StoreError};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedPageViewStore,
    pub config: Arc<Config>,
}

/// All routes of the site analytics service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { axum::response::Redirect::permanent("/analytics") }))
        .route("/health", get(health_check))
        .route("/analytics", get(handlers::analytics_page))
        .route("/analytics/raw", get(handlers::raw_page))
        .route("/analytics/json", get(handlers::page_views_json))
        .route("/api/analytics/dashboard", get(handlers::dashboard_data))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(middleware::security_headers_middleware)),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
