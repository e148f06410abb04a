// src/state.rs
use std::sync::Arc;

use crate::config::{AppConfig, PagingMode};
use crate::pagination::{ClientPaging, PagingStrategy, ServerPaging};
use crate::presenter::csv::CsvLayout;
use crate::store::ProductStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub paging: Arc<dyn PagingStrategy>,
    pub default_limit: u32,
    pub csv: CsvLayout,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, config: &AppConfig) -> Self {
        let paging: Arc<dyn PagingStrategy> = match config.paging {
            PagingMode::Server => Arc::new(ServerPaging),
            PagingMode::Client => Arc::new(ClientPaging),
        };
        Self {
            store,
            paging,
            default_limit: config.default_limit,
            csv: config.csv,
        }
    }
}
