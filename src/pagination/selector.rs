use std::sync::atomic::{AtomicU64, Ordering};

use crate::pagination::window::{PageToken, PaginationState};

/// Drives a page-selector row: activating a token moves the current page and
/// notifies `on_page_change`, which is expected to fetch the new page.
pub struct PageSelector<F>
where
    F: FnMut(usize),
{
    state: PaginationState,
    on_page_change: F,
}

impl<F> PageSelector<F>
where
    F: FnMut(usize),
{
    pub fn new(state: PaginationState, on_page_change: F) -> Self {
        Self {
            state,
            on_page_change,
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn tokens(&self) -> Vec<PageToken> {
        self.state.window()
    }

    /// Replaces the page count after a fetch reported a new total.
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.state.total_pages = total_pages;
    }

    /// Activates a token. Returns `true` if the page changed.
    ///
    /// Ellipses, the page already shown and pages outside `[1, total_pages]`
    /// are ignored.
    pub fn activate(&mut self, token: &PageToken) -> bool {
        match token.page() {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        if !self.state.has_prev() {
            return false;
        }
        self.go_to(self.state.current_page - 1)
    }

    pub fn next(&mut self) -> bool {
        if !self.state.has_next() {
            return false;
        }
        self.go_to(self.state.current_page + 1)
    }

    fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.state.total_pages || page == self.state.current_page {
            return false;
        }

        self.state.current_page = page;
        (self.on_page_change)(page);
        true
    }
}

/// Identifies one issued page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub page: usize,
    sequence: u64,
}

/// Guards against page fetches resolving out of order. Every fetch is tagged
/// with a ticket; only the response for the most recently issued ticket is
/// accepted.
#[derive(Debug, Default)]
pub struct PageRequestTracker {
    latest: AtomicU64,
}

impl PageRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, page: usize) -> Ticket {
        let sequence = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket { page, sequence }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.sequence
    }

    /// Hands back `result` if `ticket` is still the latest one, otherwise
    /// drops it.
    pub fn accept<T>(&self, ticket: &Ticket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(page = ticket.page, "discarding stale page response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activating_a_page_fires_the_callback() {
        let mut changes = Vec::new();
        let mut selector = PageSelector::new(PaginationState::new(20, 10), |page| {
            changes.push(page)
        });

        assert!(selector.activate(&PageToken::Page(11)));
        assert_eq!(selector.state().current_page, 11);
        assert!(selector.activate(&PageToken::Page(20)));
        drop(selector);

        assert_eq!(changes, vec![11, 20]);
    }

    #[test]
    fn ellipsis_current_and_out_of_range_are_ignored() {
        let mut fired = 0;
        let mut selector = PageSelector::new(PaginationState::new(5, 3), |_| fired += 1);

        assert!(!selector.activate(&PageToken::Ellipsis));
        assert!(!selector.activate(&PageToken::Page(3)));
        assert!(!selector.activate(&PageToken::Page(0)));
        assert!(!selector.activate(&PageToken::Page(6)));
        assert_eq!(selector.state().current_page, 3);
        drop(selector);

        assert_eq!(fired, 0);
    }

    #[test]
    fn prev_and_next_stop_at_the_edges() {
        let mut seen = Vec::new();
        let mut selector = PageSelector::new(PaginationState::new(2, 1), |page| seen.push(page));

        assert!(!selector.prev());
        assert!(selector.next());
        assert!(!selector.next());
        assert!(selector.prev());
        drop(selector);

        assert_eq!(seen, vec![2, 1]);
    }

    #[test]
    fn shrinking_total_changes_the_tokens() {
        let mut selector = PageSelector::new(PaginationState::new(20, 2), |_| {});
        assert_eq!(selector.tokens().len(), 5);

        selector.set_total_pages(3);
        assert_eq!(
            selector.tokens(),
            vec![PageToken::Page(1), PageToken::Page(2), PageToken::Page(3)]
        );
    }

    #[test]
    fn stale_responses_are_discarded() {
        let tracker = PageRequestTracker::new();

        let first = tracker.issue(2);
        let second = tracker.issue(3);

        assert_eq!(tracker.accept(&first, "page two"), None);
        assert_eq!(tracker.accept(&second, "page three"), Some("page three"));
        assert_eq!(second.page, 3);
    }
}
