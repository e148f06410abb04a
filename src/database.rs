// src/database.rs
use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::{Backend, DatabaseConfig};
use crate::store::{PgProductStore, ProductStore, SqliteProductStore, TableRef};

const SEED_ROWS: i64 = 100;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// In-memory databases live and die with their connection, so they get a
/// single connection that is never reaped.
pub async fn connect_sqlite(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

/// Creates the product table when missing and fills an empty one with the
/// fixture catalog: `Product i` priced `10 * i`, 11x6x9, weight 2.
pub async fn init_sqlite_schema(pool: &SqlitePool, table: &TableRef) -> Result<(), sqlx::Error> {
    let table = table.qualified();

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id_product  INTEGER PRIMARY KEY,
            description TEXT    NOT NULL,
            price       REAL    NOT NULL,
            width       INTEGER NOT NULL,
            height      INTEGER NOT NULL,
            length      INTEGER NOT NULL,
            weight      REAL    NOT NULL
        )"
    ))
    .execute(pool)
    .await?;

    let existing: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let insert = format!(
        "INSERT INTO {table} (id_product, description, price, width, height, length, weight)
         VALUES (?, ?, ?, ?, ?, ?, ?)"
    );
    let mut tx = pool.begin().await?;
    for i in 1..=SEED_ROWS {
        sqlx::query(&insert)
            .bind(i)
            .bind(format!("Product {i}"))
            .bind(10.0 * i as f64)
            .bind(11)
            .bind(6)
            .bind(9)
            .bind(2.0)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(%table, rows = SEED_ROWS, "Seeded product table");
    Ok(())
}

/// Opens the configured backend and wraps it in its `ProductStore`.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, sqlx::Error> {
    match config.backend {
        Backend::Postgres => {
            let pool = create_pool(&config.url, config.max_connections).await?;
            Ok(Arc::new(PgProductStore::new(pool, config.table.clone())))
        }
        Backend::Sqlite => {
            let pool = connect_sqlite(&config.url, config.max_connections).await?;
            if config.seed {
                init_sqlite_schema(&pool, &config.table).await?;
            }
            Ok(Arc::new(SqliteProductStore::new(pool, config.table.clone())))
        }
    }
}
