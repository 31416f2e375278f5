//! Bounded retry and post-success delay for polite fetching.
//!
//! Wraps any [`Fetcher`] transport. Each call makes up to `max_retries`
//! attempts back to back (flat retry, no backoff). After a successful
//! response the fetcher sleeps for `delay` before handing the body back, so
//! with a sequential caller successful requests are always spaced at least
//! `delay` apart. Failed attempts are never followed by a sleep, and an
//! error that [`AppError::is_retryable`](crate::error::AppError::is_retryable)
//! rejects ends the call at once.

use std::time::Duration;

use crate::models::FetchResult;
use crate::traits::Fetcher;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Retry and rate-limit settings for [`RetryingFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts per URL.
    pub max_retries: u32,
    /// Sleep applied after every successful response.
    pub delay: Duration,
}

impl RetryConfig {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

impl Default for RetryConfig {
    /// 3 attempts, 1 second delay.
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_DELAY)
    }
}

/// A [`Fetcher`] wrapper that retries failed attempts and rate-limits
/// successful ones.
#[derive(Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    config: RetryConfig,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> RetryConfig {
        self.config
    }

    /// Fetch `url`, absorbing transport errors into [`FetchResult::Failure`].
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut last_error = String::from("no attempts made");

        for attempt in 1..=self.config.max_retries {
            match self.inner.fetch(url).await {
                Ok(body) => {
                    tokio::time::sleep(self.config.delay).await;
                    return FetchResult::Success(body);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::error!(%url, error = %e, "Request failed, not retrying");
                    return FetchResult::Failure(e.to_string());
                }
                Err(e) => {
                    tracing::warn!(
                        %url,
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %e,
                        "Request failed, retrying"
                    );
                    last_error = e.to_string();
                }
            }
        }

        tracing::error!(
            "Failed to retrieve {} after {} attempts",
            url,
            self.config.max_retries
        );
        FetchResult::Failure(last_error)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::error::AppError;
    use crate::testutil::MockFetcher;

    fn transient() -> AppError {
        AppError::NetworkError("connection reset".into())
    }

    #[tokio::test]
    async fn succeeds_after_k_failures() {
        let inner = MockFetcher::with_responses(vec![
            Err(transient()),
            Err(AppError::HttpError("HTTP 502".into())),
            Ok("<html>ok</html>".into()),
        ]);
        let fetcher = RetryingFetcher::new(inner.clone(), RetryConfig::new(3, Duration::ZERO));

        let result = fetcher.fetch("http://example.com/a").await;

        assert_eq!(result, FetchResult::Success("<html>ok</html>".into()));
        assert_eq!(inner.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausts_all_attempts_then_fails() {
        let inner = MockFetcher::failing("connection reset");
        let fetcher = RetryingFetcher::new(inner.clone(), RetryConfig::new(4, Duration::ZERO));

        let result = fetcher.fetch("http://example.com/a").await;

        assert!(matches!(result, FetchResult::Failure(ref msg) if msg.contains("connection reset")));
        assert_eq!(inner.call_count(), 4);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let inner = MockFetcher::with_responses(vec![
            Err(AppError::InvalidUrl("relative URL without a base".into())),
            Ok("<html>ok</html>".into()),
        ]);
        let fetcher = RetryingFetcher::new(inner.clone(), RetryConfig::new(3, Duration::ZERO));

        let result = fetcher.fetch("fighter-details/x").await;

        assert!(matches!(result, FetchResult::Failure(ref msg) if msg.contains("relative URL")));
        assert_eq!(inner.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_retries_makes_no_attempt() {
        let inner = MockFetcher::new("<html>ok</html>");
        let fetcher = RetryingFetcher::new(inner.clone(), RetryConfig::new(0, Duration::ZERO));

        assert!(!fetcher.fetch("http://example.com").await.is_success());
        assert_eq!(inner.call_count(), 0);
    }

    #[tokio::test]
    async fn waits_after_success() {
        let inner = MockFetcher::new("<html>ok</html>");
        let fetcher =
            RetryingFetcher::new(inner, RetryConfig::new(3, Duration::from_millis(100)));

        let start = Instant::now();
        assert!(fetcher.fetch("http://example.com").await.is_success());
        let elapsed = start.elapsed();

        assert!(
            elapsed >= Duration::from_millis(100),
            "Successful fetch should wait at least 100ms, elapsed: {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn does_not_wait_after_failure() {
        let inner = MockFetcher::failing("connection reset");
        let fetcher =
            RetryingFetcher::new(inner, RetryConfig::new(3, Duration::from_millis(300)));

        let start = Instant::now();
        assert!(!fetcher.fetch("http://example.com").await.is_success());
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(300),
            "Failed fetch should not sleep, elapsed: {elapsed:?}"
        );
    }

    #[test]
    fn default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay, Duration::from_secs(1));
    }
}
