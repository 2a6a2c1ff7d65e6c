use crate::database::query::PageRequest;
use crate::pagination::window::total_pages;

/// One page of rows plus the number of rows across all pages.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> PageResult<T> {
    // Create a new page result
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    // Create an empty page result
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Number of pages the total spans at the given page size
    pub fn total_pages(&self, page_size: i64) -> usize {
        total_pages(self.total.max(0) as u64, page_size.max(1) as u64)
    }

    // Check if rows remain after this page
    pub fn has_more(&self, request: &PageRequest) -> bool {
        request.range().offset.saturating_add(self.count() as i64) < self.total
    }

    // Transform the items using a closure while preserving the total
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    // Get pagination info
    pub fn pagination_info(&self, request: &PageRequest) -> PaginationInfo {
        let range = request.range();

        PaginationInfo {
            current_page: request.page(),
            total_pages: self.total_pages(range.limit),
            has_next: self.has_more(request),
            has_prev: range.offset > 0,
            offset: range.offset,
            limit: range.limit,
        }
    }
}

// Pagination metadata for API responses
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub offset: i64,
    pub limit: i64,
}
