use std::path::Path;

use axum::{routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::dashboard::handlers as dashboard_handlers;
use crate::openapi::swagger_ui;
use crate::tiles::handlers as tile_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather proxy routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather))
        .route("/weather/{city}", get(weather_handlers::get_weather))
}

/// Build the dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handlers::get_dashboard))
        .route("/dashboard/{city}", get(dashboard_handlers::get_dashboard))
}

/// Build the map overlay tile routes
fn tile_routes() -> Router<AppState> {
    Router::new().route("/tiles/{layer}/{z}/{x}/{y}", get(tile_handlers::get_tile))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(dashboard_routes())
        .merge(tile_routes())
}

/// Build the complete application router.
///
/// With a static directory configured, unknown paths serve its files and fall
/// back to `index.html`; otherwise `/` answers the health check.
pub fn build_router(static_dir: Option<&str>) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", api_v1_routes())
        .merge(swagger_ui());

    match static_dir {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.route("/", get(weather_handlers::health)),
    }
}
