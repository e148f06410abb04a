// src/handlers/product.rs
use std::collections::HashMap;

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    response::Response,
};
use tracing::{error, instrument};

use crate::dtos::product::{PaginatedProductsResponse, ProductDetail, ProductSummary};
use crate::error::AppError;
use crate::pagination::{PageRequest, PageRequestError};
use crate::presenter::ResponseFormat;
use crate::state::AppState;
use crate::store::StoreError;

fn parse_param(
    params: &HashMap<String, String>,
    key: &str,
    default: i64,
    on_error: PageRequestError,
) -> Result<i64, AppError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => Ok(value),
            // Too many digits for i64 is still a large positive number.
            Err(_) if is_positive_integer(raw) => Ok(i64::MAX),
            Err(_) => Err(AppError::validation(on_error.message())),
        },
    }
}

fn is_positive_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn log_store_error(err: StoreError, context: &'static str) -> AppError {
    if let StoreError::Database(e) = &err {
        error!(?e, "{context}");
    }
    err.into()
}

// GET /products?page=&limit= - Paginated listing
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    format: ResponseFormat,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let page = parse_param(&params, "page", 1, PageRequestError::Page)?;
    let limit = parse_param(&params, "limit", i64::from(state.default_limit), PageRequestError::Limit)?;
    let request = PageRequest::new(page, limit).map_err(|e| AppError::validation(e.message()))?;

    let result = state
        .paging
        .fetch_page(state.store.as_ref(), request)
        .await
        .map_err(|e| log_store_error(e, "Failed to fetch product page"))?;

    let body = PaginatedProductsResponse {
        data: result.items.into_iter().map(ProductSummary::from).collect(),
        pagination: result.pagination,
    };
    format.render(&body, &body.data, &state.csv)
}

// GET /products/all - Every product, unpaginated
#[instrument(skip(state))]
pub async fn list_all_products(
    State(state): State<AppState>,
    format: ResponseFormat,
) -> Result<Response, AppError> {
    let products = state
        .store
        .list()
        .await
        .map_err(|e| log_store_error(e, "Failed to fetch products"))?;

    let details: Vec<ProductDetail> = products.into_iter().map(ProductDetail::from).collect();
    format.render(&details, &details, &state.csv)
}

// GET /products/{id_product} - Single product with derived metrics
#[instrument(skip(state))]
pub async fn get_product(
    id_product: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<axum::Json<ProductDetail>, AppError> {
    let Path(id_product) = id_product.map_err(|e| {
        tracing::debug!(error=%e, "Rejected product id");
        AppError::validation("Product id must be an integer")
    })?;
    let product = state
        .store
        .get(id_product)
        .await
        .map_err(|e| log_store_error(e, "Failed to fetch product"))?;

    Ok(axum::Json(ProductDetail::from(product)))
}
