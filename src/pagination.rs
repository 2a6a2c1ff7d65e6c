pub mod selector;
pub mod window;

pub use selector::{PageRequestTracker, PageSelector, Ticket};
pub use window::{
    DEFAULT_SIBLING_COUNT, PageToken, PaginationState, compute_page_window, total_pages,
};
