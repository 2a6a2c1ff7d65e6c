use serde::Serialize;

use crate::database::paginated::PageResult;
use crate::database::query::PageRequest;
use crate::pagination::{PageToken, PaginationState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: &'static str,
    pub message: String,
}

/// One page of a list, with everything a client needs to draw the page selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub ok: bool,
    /// The count of results on this page.
    pub count: usize,
    /// The count of results across all pages.
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
    /// Page-selector tokens: page numbers and `"..."` markers.
    pub pages: Vec<PageToken>,
    pub items: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new<M>(result: PageResult<M>, request: &PageRequest) -> Self
    where
        M: Into<T>,
    {
        let info = result.pagination_info(request);
        let pages = PaginationState::new(info.total_pages, info.current_page as usize)
            .clamped()
            .window();
        let items: Vec<T> = result.items.into_iter().map(Into::into).collect();

        Self {
            ok: true,
            count: items.len(),
            total: result.total,
            page: info.current_page,
            page_size: info.limit,
            total_pages: info.total_pages,
            has_next: info.has_next,
            has_prev: info.has_prev,
            pages,
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedResponse {
    pub ok: bool,
    pub id: i32,
}
