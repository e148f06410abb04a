use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{ProductStore, StoreError, StorePage, TableRef};
use crate::models::product::Product;
use crate::pagination::PageRequest;

const COLUMNS: &str = "id_product, description,
                CAST(price AS REAL)  AS price,
                width, height, length,
                CAST(weight AS REAL) AS weight";

/// SQLite implementation of `ProductStore`
pub struct SqliteProductStore {
    pool: SqlitePool,
    table: TableRef,
}

impl SqliteProductStore {
    pub fn new(pool: SqlitePool, table: TableRef) -> Self {
        Self { pool, table }
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
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

        let sql = format!("SELECT {COLUMNS} FROM {table} ORDER BY id_product LIMIT ? OFFSET ?");
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
            "SELECT {COLUMNS} FROM {} WHERE id_product = ?",
            self.table.qualified()
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id_product)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id_product))
    }
}
