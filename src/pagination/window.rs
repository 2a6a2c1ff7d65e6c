use serde::{Serialize, Serializer};

/// Pages shown on each side of the current page when nothing else is asked for.
pub const DEFAULT_SIBLING_COUNT: usize = 1;

/// A single entry in a page-selector row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageToken {
    /// A 1-based page number.
    Page(usize),
    /// A collapsed run of pages.
    Ellipsis,
}

impl PageToken {
    /// The page this token points at, or `None` for an ellipsis.
    pub fn page(&self) -> Option<usize> {
        match self {
            PageToken::Page(page) => Some(*page),
            PageToken::Ellipsis => None,
        }
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self, PageToken::Ellipsis)
    }
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(page) => serializer.serialize_u64(*page as u64),
            PageToken::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Number of pages needed to hold `total_items` at `page_size` items each.
/// A page size of zero is treated as one.
pub fn total_pages(total_items: u64, page_size: u64) -> usize {
    total_items.div_ceil(page_size.max(1)) as usize
}

/// Computes the page-selector row for a paginated list.
///
/// The first page, the last page and `sibling_count` pages on either side of
/// `current_page` are always shown. Longer runs collapse into
/// [`PageToken::Ellipsis`]. When `total_pages` is small enough that collapsing
/// would not save anything, every page is listed.
///
/// `current_page` is expected to lie in `[1, total_pages]`. The function does
/// not clamp it; out-of-range input produces a well-formed but meaningless
/// row, and never panics.
pub fn compute_page_window(
    total_pages: usize,
    current_page: usize,
    sibling_count: usize,
) -> Vec<PageToken> {
    // first + last + current + siblings on both sides
    let total_numbers = sibling_count.saturating_mul(2).saturating_add(3);
    // plus room for two ellipses
    let total_blocks = total_numbers.saturating_add(2);

    if total_pages <= total_blocks {
        return pages(1, total_pages).collect();
    }

    let left_sibling_index = current_page.saturating_sub(sibling_count).max(1);
    let right_sibling_index = current_page
        .saturating_add(sibling_count)
        .min(total_pages);

    let should_show_left_dots = left_sibling_index > 2;
    let should_show_right_dots = right_sibling_index < total_pages - 1;

    let edge_item_count = sibling_count.saturating_mul(2).saturating_add(1);

    if !should_show_left_dots && should_show_right_dots {
        let mut window: Vec<PageToken> = pages(1, edge_item_count).collect();
        window.push(PageToken::Ellipsis);
        window.push(PageToken::Page(total_pages));
        return window;
    }

    if should_show_left_dots && !should_show_right_dots {
        let mut window = vec![PageToken::Page(1), PageToken::Ellipsis];
        window.extend(pages(total_pages - edge_item_count + 1, total_pages));
        return window;
    }

    if should_show_left_dots && should_show_right_dots {
        let mut window = vec![PageToken::Page(1), PageToken::Ellipsis];
        window.extend(pages(left_sibling_index, right_sibling_index));
        window.push(PageToken::Ellipsis);
        window.push(PageToken::Page(total_pages));
        return window;
    }

    // Unreachable for consistent input.
    Vec::new()
}

fn pages(first: usize, last: usize) -> impl Iterator<Item = PageToken> {
    (first..=last).map(PageToken::Page)
}

/// Everything needed to draw a page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub total_pages: usize,
    pub current_page: usize,
    pub sibling_count: usize,
}

impl PaginationState {
    pub fn new(total_pages: usize, current_page: usize) -> Self {
        Self {
            total_pages,
            current_page,
            sibling_count: DEFAULT_SIBLING_COUNT,
        }
    }

    pub fn with_sibling_count(mut self, sibling_count: usize) -> Self {
        self.sibling_count = sibling_count;
        self
    }

    /// Copy of this state with `current_page` pulled into `[1, total_pages]`.
    /// With no pages at all the current page is left untouched.
    pub fn clamped(self) -> Self {
        if self.total_pages == 0 {
            return self;
        }

        Self {
            current_page: self.current_page.clamp(1, self.total_pages),
            ..self
        }
    }

    pub fn window(&self) -> Vec<PageToken> {
        compute_page_window(self.total_pages, self.current_page, self.sibling_count)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1 && self.total_pages > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
