use axum::{
    routing::get,
    Router,
};
use crate::handlers::product::{list_products, list_all_products, get_product};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/all", get(list_all_products))
        .route("/products/{id_product}", get(get_product))
}
