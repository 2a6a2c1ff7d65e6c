//! In-memory stand-ins for the Postgres store.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};

use crate::database::Result;
use crate::database::query::{PageRange, RowStore, ScanQuery};
use crate::database::retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};

/// Default attempt count with no waiting between attempts.
pub fn immediate_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: DEFAULT_MAX_ATTEMPTS,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        jitter: Duration::ZERO,
    }
}

/// Serves pre-filtered, pre-ordered rows. Filters on the incoming query are
/// recorded but not evaluated.
pub struct MemoryStore<T> {
    rows: Vec<T>,
    policy: RetryPolicy,
    failure: Option<fn() -> sqlx::Error>,
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
    queries: Mutex<Vec<ScanQuery>>,
}

impl<T> MemoryStore<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            policy: immediate_policy(),
            failure: None,
            failures_left: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fails every scan.
    pub fn failing_with(self, failure: fn() -> sqlx::Error) -> Self {
        self.failing_times(usize::MAX, failure)
    }

    /// Fails the first `times` scans, then serves rows.
    pub fn failing_times(mut self, times: usize, failure: fn() -> sqlx::Error) -> Self {
        self.failure = Some(failure);
        self.failures_left = AtomicUsize::new(times);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ScanQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn should_fail(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<T> RowStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn scan(&self, query: &ScanQuery, range: PageRange) -> Result<(Vec<T>, i64)> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        if let Some(failure) = self.failure {
            if self.should_fail() {
                return Err(failure().into());
            }
        }

        let len = self.rows.len();
        let start = usize::try_from(range.offset).unwrap_or(usize::MAX).min(len);
        let end = usize::try_from(range.limit)
            .unwrap_or(usize::MAX)
            .saturating_add(start)
            .min(len);

        Ok((self.rows[start..end].to_vec(), len as i64))
    }
}

/// An error as the Postgres server would report it, with a SQLSTATE.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ServerError {
    code: &'static str,
    message: &'static str,
    constraint: Option<&'static str>,
}

impl ServerError {
    pub fn new(code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            message,
            constraint: None,
        }
    }

    pub fn unique_violation(constraint: &'static str) -> Self {
        Self {
            code: "23505",
            message: "duplicate key value violates unique constraint",
            constraint: Some(constraint),
        }
    }
}

impl DatabaseError for ServerError {
    fn message(&self) -> &str {
        self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.code))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint
    }

    fn kind(&self) -> ErrorKind {
        match self.code {
            "23505" => ErrorKind::UniqueViolation,
            "23503" => ErrorKind::ForeignKeyViolation,
            "23502" => ErrorKind::NotNullViolation,
            "23514" => ErrorKind::CheckViolation,
            _ => ErrorKind::Other,
        }
    }
}

impl From<ServerError> for crate::database::DatabaseError {
    fn from(error: ServerError) -> Self {
        crate::database::DatabaseError::Sqlx(error.into())
    }
}
