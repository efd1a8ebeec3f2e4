use serde::{Deserialize, Serialize};

/// One page of results plus the total across all pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: i64, page_size: i64) -> Self {
        Self {
            items,
            total_count,
            page,
            page_size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
