pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod middleware;
pub mod security;
pub mod controllers;
pub mod services;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
}

// Маршруты аутентификации живут в корне, остальное под /api.
// Вынесено из main, чтобы тесты могли собрать такой же роутер.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Event System API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::auth::routes())
        .nest("/api", controllers::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
