use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::database::Result;
use crate::database::paginated::PageResult;
use crate::database::retry::{RetryPolicy, with_retry};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A 1-based page request as it arrives from a query string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// The requested page, at least 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// The requested page size, defaulting to [`DEFAULT_PAGE_SIZE`], at least 1.
    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn range(&self) -> PageRange {
        let page_size = self.page_size();

        PageRange {
            offset: (self.page() - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

/// Zero-based row window of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub offset: i64,
    pub limit: i64,
}

impl PageRange {
    /// Every row from the start.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: i64::MAX,
        }
    }

    /// Index of the last requested row, inclusive.
    pub fn last_index(&self) -> i64 {
        self.offset.saturating_add(self.limit) - 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: &'static str, value: Value },

    /// `column IN (SELECT key FROM table WHERE filter)`
    Related {
        column: &'static str,
        table: &'static str,
        key: &'static str,
        filter: Box<Filter>,
    },
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn related(
        column: &'static str,
        table: &'static str,
        key: &'static str,
        filter: Filter,
    ) -> Self {
        Filter::Related {
            column,
            table,
            key,
            filter: Box::new(filter),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}

/// A filtered, ordered read of one table. Column and table names are trusted
/// identifiers; only filter values are bound as parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanQuery {
    pub table: &'static str,
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
}

impl ScanQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, order_by: &[OrderBy]) -> Self {
        self.order_by.extend_from_slice(order_by);
        self
    }
}

/// Something that can serve one window of a filtered, ordered table along
/// with the exact number of rows matching the filters.
#[async_trait]
pub trait RowStore<T>: Send + Sync
where
    T: Send,
{
    fn retry_policy(&self) -> &RetryPolicy;

    /// Returns the rows inside `range` and the total ignoring `range`.
    async fn scan(&self, query: &ScanQuery, range: PageRange) -> Result<(Vec<T>, i64)>;
}

/// Reads one page of `scan`. Failures are logged and served as an empty page.
#[tracing::instrument(skip(store))]
pub async fn fetch_page<T, S>(store: &S, scan: &ScanQuery, request: PageRequest) -> PageResult<T>
where
    T: Send,
    S: RowStore<T> + ?Sized,
{
    let range = request.range();

    read_or_default(
        "fetch_page",
        store.retry_policy(),
        PageResult::empty(),
        move || async move {
            let (items, total) = store.scan(scan, range).await?;
            Ok(PageResult::new(items, total))
        },
    )
    .await
}

/// Reads every row of `scan`. Failures are logged and served as an empty list.
pub async fn fetch_every<T, S>(store: &S, scan: &ScanQuery) -> Vec<T>
where
    T: Send,
    S: RowStore<T> + ?Sized,
{
    read_or_default(
        "fetch_every",
        store.retry_policy(),
        Vec::new(),
        move || async move {
            let (items, _) = store.scan(scan, PageRange::unbounded()).await?;
            Ok(items)
        },
    )
    .await
}

/// Reads the first row of `scan`. Failures are logged and served as `None`.
pub async fn fetch_one<T, S>(store: &S, scan: &ScanQuery) -> Option<T>
where
    T: Send,
    S: RowStore<T> + ?Sized,
{
    let range = PageRange {
        offset: 0,
        limit: 1,
    };

    read_or_default("fetch_one", store.retry_policy(), None, move || async move {
        let (items, _) = store.scan(scan, range).await?;
        Ok(items.into_iter().next())
    })
    .await
}

/// Read path: retries, then logs a final failure and returns `default`.
pub async fn read_or_default<T, F, Fut>(
    op: &str,
    policy: &RetryPolicy,
    default: T,
    operation: F,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match with_retry(op, policy, operation).await {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(op, %error, "Database read failed, serving an empty result");
            default
        }
    }
}

/// Write path: retries, then logs a final failure and returns it.
pub async fn write_or_raise<T, F, Fut>(op: &str, policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    with_retry(op, policy, operation)
        .await
        .inspect_err(|error| tracing::error!(op, %error, "Database write failed"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::database::DatabaseError;
    use crate::database::testing::{MemoryStore, immediate_policy};
    use crate::pagination::total_pages;

    fn numbers(count: i32) -> MemoryStore<i32> {
        MemoryStore::new((0..count).collect())
    }

    #[test]
    fn normalizes_page_and_page_size() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);

        let request = PageRequest::new(-3, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 1);

        let request = PageRequest::new(2, 10_000);
        assert_eq!(request.page_size(), 10_000);
    }

    #[test]
    fn computes_offset_and_inclusive_range() {
        let range = PageRequest::new(3, 10).range();
        assert_eq!(range.offset, 20);
        assert_eq!(range.limit, 10);
        assert_eq!(range.last_index(), 29);

        let range = PageRequest::new(i64::MAX, 100).range();
        assert_eq!(range.offset, i64::MAX);
    }

    #[test]
    fn deserializes_from_query_strings() {
        let request: PageRequest = serde_json::from_str(r#"{"page": 4}"#).unwrap();
        assert_eq!(request.page(), 4);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn pages_cover_the_dataset_exactly() {
        let store = numbers(23);
        let scan = ScanQuery::new("numbers");
        let mut seen = Vec::new();

        for page in 1..=3 {
            let result = fetch_page(&store, &scan, PageRequest::new(page, 10)).await;
            assert_eq!(result.total, 23);
            assert_eq!(total_pages(result.total as u64, 10), 3);

            let first = (page as i32 - 1) * 10;
            let expected: Vec<i32> = (first..(first + 10).min(23)).collect();
            assert_eq!(result.items, expected);
            seen.extend(result.items);
        }

        assert_eq!(seen, (0..23).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn large_pages_are_served_at_their_requested_size() {
        let store = numbers(300);

        let result = fetch_page(&store, &ScanQuery::new("numbers"), PageRequest::new(2, 200)).await;

        assert_eq!(result.items.first(), Some(&200));
        assert_eq!(result.count(), 100);
        assert_eq!(result.total, 300);
    }

    #[tokio::test]
    async fn short_last_page_and_pages_past_the_end() {
        let store = numbers(23);
        let scan = ScanQuery::new("numbers");

        let last = fetch_page(&store, &scan, PageRequest::new(3, 10)).await;
        assert_eq!(last.items, vec![20, 21, 22]);

        let beyond = fetch_page(&store, &scan, PageRequest::new(9, 10)).await;
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 23);
    }

    #[tokio::test]
    async fn read_failures_degrade_to_an_empty_page() {
        let store = numbers(23).failing_with(|| sqlx::Error::PoolTimedOut);

        let result = fetch_page(&store, &ScanQuery::new("numbers"), PageRequest::default()).await;

        assert_eq!(result, PageResult::empty());
        assert_eq!(store.attempts(), 3);
    }

    #[tokio::test]
    async fn non_transient_read_failures_are_tried_once() {
        let store = numbers(5).failing_with(|| sqlx::Error::ColumnNotFound("featured".to_owned()));

        assert_eq!(fetch_one(&store, &ScanQuery::new("numbers")).await, None);
        assert!(fetch_every(&store, &ScanQuery::new("numbers")).await.is_empty());
        assert_eq!(store.attempts(), 2);
    }

    #[tokio::test]
    async fn transient_read_failures_recover() {
        let store = numbers(5).failing_times(2, || sqlx::Error::PoolTimedOut);

        let result = fetch_page(&store, &ScanQuery::new("numbers"), PageRequest::default()).await;

        assert_eq!(result.items, vec![0, 1, 2, 3, 4]);
        assert_eq!(store.attempts(), 3);
    }

    #[tokio::test]
    async fn write_failures_are_raised() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result: Result<()> = write_or_raise("create", &immediate_policy(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        })
        .await;

        assert!(matches!(
            result,
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn builds_scans() {
        let scan = ScanQuery::new("posts")
            .filter(Filter::eq("published", true))
            .order(&[OrderBy::desc("created_at")]);

        assert_eq!(scan.table, "posts");
        assert_eq!(scan.filters, vec![Filter::eq("published", Value::Bool(true))]);
        assert_eq!(scan.order_by[0].direction.as_sql(), "DESC");
    }
}
