//! Reference collection service for HRMS Lite: employees and their daily
//! attendance, stored in SQLite and served as JSON.

pub mod config;
pub mod db;
pub mod domain;
pub mod rest;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub use config::BackendConfig;
pub use db::DbConnection;
pub use rest::AppState;

/// Full application: routes plus CORS for the configured origins
pub fn app(db: DbConnection, config: &BackendConfig) -> Router {
    rest::router(AppState::new(db)).layer(cors_layer(config))
}

fn cors_layer(config: &BackendConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
