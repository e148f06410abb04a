pub mod products;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
}

/// Full application: catalog routes, banner, health check and CORS for
/// browser clients.
pub fn build_app(state: AppState) -> Router {
    create_router()
        .route("/", get(|| async { "Catalog API" }))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
