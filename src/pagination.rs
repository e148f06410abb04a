//! Page windows and the two ways of producing them.
//!
//! `ServerPaging` asks the store for one window plus a row count.
//! `ClientPaging` fetches the full list and slices it in memory, the way a
//! client that re-paginates over a complete fetch does. The two never mix
//! within a request.

use async_trait::async_trait;
use serde::Serialize;

use crate::models::product::Product;
use crate::store::{ProductStore, StoreError};

pub const MAX_LIMIT: u32 = 10_000;

pub const PAGE_ERROR: &str = "Page must be greater than 0";
pub const LIMIT_ERROR: &str = "Limit must be between 1 and 10000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequestError {
    Page,
    Limit,
}

impl PageRequestError {
    pub fn message(self) -> &'static str {
        match self {
            PageRequestError::Page => PAGE_ERROR,
            PageRequestError::Limit => LIMIT_ERROR,
        }
    }
}

/// Validated paging parameters: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
/// Any positive page is accepted; pages past the data come back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, PageRequestError> {
        let page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PageRequestError::Page)?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or(PageRequestError::Limit)?;
        Ok(Self { page, limit })
    }

    /// Saturates instead of overflowing for absurdly large pages.
    pub fn offset(&self) -> i64 {
        let skipped = (self.page - 1).saturating_mul(u64::from(self.limit));
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }
}

/// Page metadata as rendered in JSON responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// `total_pages = ceil(total / limit)`. Pages past the end still get
/// well-formed metadata.
pub fn paginate(total: u64, page: u64, limit: u32) -> Pagination {
    debug_assert!(limit >= 1, "limit must be validated before paginating");
    let total_pages = total.div_ceil(u64::from(limit));
    Pagination {
        page,
        limit,
        total,
        total_pages,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}

/// The `[(page-1)*limit, page*limit)` window of an already-fetched list,
/// clamped to its length.
pub fn slice_page<T>(items: &[T], page: u64, limit: u32) -> &[T] {
    let skipped = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
    let start = skipped.saturating_mul(limit as usize);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(limit as usize).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[async_trait]
pub trait PagingStrategy: Send + Sync {
    async fn fetch_page(
        &self,
        store: &dyn ProductStore,
        request: PageRequest,
    ) -> Result<PageResult<Product>, StoreError>;
}

/// Offset/limit windowing done by the database.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerPaging;

#[async_trait]
impl PagingStrategy for ServerPaging {
    async fn fetch_page(
        &self,
        store: &dyn ProductStore,
        request: PageRequest,
    ) -> Result<PageResult<Product>, StoreError> {
        let page = store.list_paginated(request).await?;
        Ok(PageResult {
            items: page.products,
            pagination: paginate(page.total, request.page, request.limit),
        })
    }
}

/// Full fetch, then an in-memory slice.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientPaging;

#[async_trait]
impl PagingStrategy for ClientPaging {
    async fn fetch_page(
        &self,
        store: &dyn ProductStore,
        request: PageRequest,
    ) -> Result<PageResult<Product>, StoreError> {
        let all = store.list().await?;
        let items = slice_page(&all, request.page, request.limit).to_vec();
        Ok(PageResult {
            items,
            pagination: paginate(all.len() as u64, request.page, request.limit),
        })
    }
}
