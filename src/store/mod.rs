//! Product storage.
//!
//! `ProductStore` is the only way handlers and paging strategies reach the
//! database. Backends differ in placeholder syntax and in how NUMERIC columns
//! are read, never in behavior.

pub mod postgres;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::product::Product;
use crate::pagination::PageRequest;

pub use postgres::PgProductStore;
pub use sqlite::SqliteProductStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One window of products plus the total row count, read by two
/// independent queries.
#[derive(Debug, Clone)]
pub struct StorePage {
    pub products: Vec<Product>,
    pub total: u64,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products ordered by identifier.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Products in `[(page-1)*limit, page*limit)` ordered by identifier,
    /// along with the total row count.
    async fn list_paginated(&self, request: PageRequest) -> Result<StorePage, StoreError>;

    async fn get(&self, id_product: i64) -> Result<Product, StoreError>;
}

#[derive(Debug, Error)]
#[error("invalid SQL identifier: {0:?}")]
pub struct InvalidIdentifier(pub String);

/// Optionally schema-qualified product table. Both parts are validated as
/// plain identifiers so they can be spliced into statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    schema: Option<String>,
    table: String,
}

impl TableRef {
    pub fn new(schema: Option<&str>, table: &str) -> Result<Self, InvalidIdentifier> {
        let schema = match schema.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(validate_identifier(s)?),
            None => None,
        };
        Ok(Self {
            schema,
            table: validate_identifier(table.trim())?,
        })
    }

    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.clone(),
        }
    }
}

impl Default for TableRef {
    fn default() -> Self {
        Self { schema: None, table: "product".to_string() }
    }
}

fn validate_identifier(ident: &str) -> Result<String, InvalidIdentifier> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(ident.to_string())
    } else {
        Err(InvalidIdentifier(ident.to_string()))
    }
}
