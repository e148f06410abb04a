// src/config.rs
use std::net::IpAddr;

use thiserror::Error;

use crate::pagination::{PageRequest, MAX_LIMIT};
use crate::presenter::csv::{CsvLayout, Quoting};
use crate::store::{InvalidIdentifier, TableRef};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("unsupported database URL {0:?}; expected postgres:// or sqlite:")]
    UnsupportedDatabase(String),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error(transparent)]
    Identifier(#[from] InvalidIdentifier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(ConfigError::UnsupportedDatabase(url.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingMode {
    Server,
    Client,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub backend: Backend,
    pub table: TableRef,
    pub max_connections: u32,
    pub seed: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub paging: PagingMode,
    pub default_limit: u32,
    pub csv: CsvLayout,
    pub host: IpAddr,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let backend = Backend::from_url(&url)?;
        let table = TableRef::new(
            get("DB_SCHEMA").as_deref(),
            get("DB_TABLE").as_deref().unwrap_or("product"),
        )?;
        let max_connections = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5u32)?;
        let seed = parse_bool(get("SEED_DATABASE"), "SEED_DATABASE", true)?;

        let paging = match get("PAGING_STRATEGY").map(|v| v.to_ascii_lowercase()) {
            None => PagingMode::Server,
            Some(v) if v == "server" => PagingMode::Server,
            Some(v) if v == "client" => PagingMode::Client,
            Some(v) => return Err(ConfigError::Invalid { key: "PAGING_STRATEGY", value: v }),
        };

        let default_limit = parse_or(get("DEFAULT_PAGE_LIMIT"), "DEFAULT_PAGE_LIMIT", 1000u32)?;
        if PageRequest::new(1, i64::from(default_limit)).is_err() {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_LIMIT",
                value: format!("{default_limit} (must be 1..={MAX_LIMIT})"),
            });
        }

        let delimiter = match get("CSV_DELIMITER") {
            None => ';',
            Some(v) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '"' && c != '\n' && c != '\r' => c,
                    _ => return Err(ConfigError::Invalid { key: "CSV_DELIMITER", value: v }),
                }
            }
        };
        let quoting = match get("CSV_QUOTING").map(|v| v.to_ascii_lowercase()) {
            None => Quoting::Always,
            Some(v) if v == "always" => Quoting::Always,
            Some(v) if v == "necessary" => Quoting::Necessary,
            Some(v) => return Err(ConfigError::Invalid { key: "CSV_QUOTING", value: v }),
        };
        let csv = CsvLayout {
            delimiter,
            header: parse_bool(get("CSV_HEADER"), "CSV_HEADER", true)?,
            quoting,
        };

        let host = parse_or(get("HOST"), "HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or(get("PORT"), "PORT", 3001u16)?;

        Ok(Self {
            database: DatabaseConfig { url, backend, table, max_connections, seed },
            paging,
            default_limit,
            csv,
            host,
            port,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::Invalid { key, value: v }),
    }
}
