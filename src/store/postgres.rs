use async_trait::async_trait;
use sqlx::PgPool;

use super::{ProductStore, StoreError, StorePage, TableRef};
use crate::models::product::Product;
use crate::pagination::PageRequest;

// NUMERIC columns are cast to FLOAT8 so they decode straight into f64.
const COLUMNS: &str = "id_product::INT8 AS id_product, description,
                price::FLOAT8  AS price,
                width::INT4    AS width,
                height::INT4   AS height,
                length::INT4   AS length,
                weight::FLOAT8 AS weight";

pub struct PgProductStore {
    pool: PgPool,
    table: TableRef,
}

impl PgProductStore {
    pub fn new(pool: PgPool, table: TableRef) -> Self {
        Self { pool, table }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY id_product",
            self.table.qualified()
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn list_paginated(&self, request: PageRequest) -> Result<StorePage, StoreError> {
        let table = self.table.qualified();

        let sql = format!("SELECT {COLUMNS} FROM {table} ORDER BY id_product LIMIT $1 OFFSET $2");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(i64::from(request.limit))
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) AS total FROM {table}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&self.pool)
            .await?;

        Ok(StorePage {
            products,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn get(&self, id_product: i64) -> Result<Product, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE id_product = $1",
            self.table.qualified()
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id_product)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id_product))
    }
}
