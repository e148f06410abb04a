//! Product catalog service: paginated product listings over HTTP in JSON or
//! CSV, backed by PostgreSQL or SQLite.

pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod presenter;
pub mod routes;
pub mod state;
pub mod store;
