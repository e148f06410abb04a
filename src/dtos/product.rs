// src/dtos/product.rs
use serde::Serialize;

use crate::models::product::Product;
use crate::pagination::Pagination;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id_product: i64,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id_product: i64,
    pub description: String,
    pub price: f64,
    pub width: i32,
    pub height: i32,
    pub length: i32,
    pub weight: f64,
    pub volume: f64,
    pub density: f64,
}

#[derive(Debug, Serialize)]
pub struct PaginatedProductsResponse {
    pub data: Vec<ProductSummary>,
    pub pagination: Pagination,
}

// Convert from Model to Response DTOs
impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id_product: product.id_product,
            description: product.description,
            price: product.price,
        }
    }
}

impl From<Product> for ProductDetail {
    fn from(product: Product) -> Self {
        let volume = product.volume();
        let density = product.density();
        Self {
            id_product: product.id_product,
            description: product.description,
            price: product.price,
            width: product.width,
            height: product.height,
            length: product.length,
            weight: product.weight,
            volume,
            density,
        }
    }
}
