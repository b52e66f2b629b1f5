use serde::Serialize;

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    /// Requested 1-based page number.
    pub page: usize,
    /// Number of items matching the filter across all pages.
    pub total: usize,
}

/// One page of items plus the metadata needed to page further.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> PageResult<T> {
    pub fn new(data: Vec<T>, page: usize, total: usize) -> Self {
        Self {
            data,
            pagination: PageInfo { page, total },
        }
    }
}
