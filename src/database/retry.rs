use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::database::{DatabaseError, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_JITTER: Duration = Duration::from_millis(100);

/// SQLSTATE codes that mean the server went away or is refusing work for now.
const TRANSIENT_SQLSTATES: &[&str] = &["57P01", "57P02", "57P03", "53300"];

/// Message fragments of errors that are worth retrying.
const TRANSIENT_MESSAGES: &[&str] = &[
    "timeout",
    "timed out",
    "connection",
    "network",
    "econnrefused",
    "econnreset",
    "shutting down",
];

/// How often and how patiently a store operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the random delay added to every backoff.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following the `attempt`-th failure.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1 << exponent);

        backoff
            .saturating_add(self.random_jitter())
            .min(self.max_delay)
    }

    fn random_jitter(&self) -> Duration {
        let max = self.jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }

        Duration::from_millis(rand::rng().random_range(0..=max))
    }
}

/// Whether an error is the kind that may go away on its own.
pub fn is_transient(error: &DatabaseError) -> bool {
    match error {
        DatabaseError::Sqlx(error) => is_transient_sqlx(error),
        DatabaseError::Post(_) | DatabaseError::Project(_) => false,
    }
}

fn is_transient_sqlx(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,

        // A SQLSTATE is authoritative. Messages quote identifiers, so a
        // column named `network_id` must not read as a network failure.
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => {
                let code: &str = &code;
                code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&code)
            }
            None => db.constraint().is_none() && mentions_transient(db.message()),
        },

        sqlx::Error::Protocol(message) => mentions_transient(message),

        sqlx::Error::Configuration(_)
        | sqlx::Error::RowNotFound
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => false,

        other => mentions_transient(&other.to_string()),
    }
}

fn mentions_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MESSAGES
        .iter()
        .any(|fragment| message.contains(fragment))
}

/// Runs `operation`, retrying transient failures with exponential backoff.
///
/// Non-transient errors are returned after the first attempt. Transient ones
/// are retried until `policy.max_attempts` attempts have been made, and the
/// last error is returned.
pub async fn with_retry<T, F, Fut>(op: &str, policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts && is_transient(&error) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    op,
                    attempt,
                    max_attempts,
                    ?delay,
                    %error,
                    "Transient database error, retrying"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::database::testing::{ServerError, immediate_policy};
    use crate::errors::post::PostError;

    fn connection_refused() -> DatabaseError {
        sqlx::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused")).into()
    }

    fn unique_violation() -> DatabaseError {
        ServerError::unique_violation("posts_slug_key").into()
    }

    fn server(code: &'static str, message: &'static str) -> DatabaseError {
        ServerError::new(code, message).into()
    }

    async fn attempts_for(error: fn() -> DatabaseError) -> u32 {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result: Result<()> = with_retry("test", &immediate_policy(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(error())
        })
        .await;

        assert!(result.is_err());
        attempts.load(Ordering::SeqCst)
    }

    #[test]
    fn classifies_errors() {
        assert!(is_transient(&connection_refused()));
        assert!(is_transient(&sqlx::Error::PoolTimedOut.into()));
        assert!(is_transient(
            &sqlx::Error::Protocol("Connection reset by peer".to_owned()).into()
        ));
        assert!(is_transient(
            &sqlx::Error::Protocol("the database system is shutting down".to_owned()).into()
        ));

        assert!(!is_transient(&unique_violation()));
        assert!(!is_transient(&sqlx::Error::RowNotFound.into()));
        assert!(!is_transient(
            &sqlx::Error::ColumnNotFound("case_study".to_owned()).into()
        ));
        assert!(!is_transient(
            &sqlx::Error::Configuration("bad connection string".into()).into()
        ));
        assert!(!is_transient(
            &PostError::NotFound("hello-world".to_owned()).into()
        ));
    }

    #[test]
    fn classifies_server_errors_by_sqlstate() {
        assert!(is_transient(&server("08006", "connection failure")));
        assert!(is_transient(&server("08001", "could not connect")));
        assert!(is_transient(&server(
            "57P01",
            "terminating connection due to administrator command"
        )));
        assert!(is_transient(&server("53300", "too many clients already")));

        assert!(!is_transient(&unique_violation()));
        assert!(!is_transient(&server(
            "42703",
            r#"column "network_id" does not exist"#
        )));
        assert!(!is_transient(&server(
            "42P01",
            r#"relation "connection_logs" does not exist"#
        )));
    }

    #[tokio::test]
    async fn schema_errors_are_attempted_once() {
        assert_eq!(
            attempts_for(|| server("42703", r#"column "network_id" does not exist"#)).await,
            1
        );
        assert_eq!(
            attempts_for(|| server("42P01", r#"relation "connection_logs" does not exist"#))
                .await,
            1
        );
        assert_eq!(attempts_for(unique_violation).await, 1);
    }

    #[tokio::test]
    async fn server_shutdowns_are_retried() {
        assert_eq!(
            attempts_for(|| server("57P01", "terminating connection")).await,
            DEFAULT_MAX_ATTEMPTS
        );
        assert_eq!(
            attempts_for(|| server("08006", "connection failure")).await,
            DEFAULT_MAX_ATTEMPTS
        );
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            jitter: Duration::ZERO,
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(350));
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let policy = RetryPolicy {
            jitter: Duration::from_millis(50),
            max_delay: Duration::from_secs(10),
            ..RetryPolicy::default()
        };

        for _ in 0..100 {
            let delay = policy.delay_for(1);
            assert!(delay >= policy.base_delay);
            assert!(delay <= policy.base_delay + policy.jitter);
        }
    }

    #[tokio::test]
    async fn transient_failures_stop_after_max_attempts() {
        assert_eq!(attempts_for(connection_refused).await, DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn recovers_once_the_error_clears() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result = with_retry("test", &immediate_policy(), move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(connection_refused())
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
