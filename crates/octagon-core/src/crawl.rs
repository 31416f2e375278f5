use std::time::Duration;

use url::Url;

use crate::error::AppError;
use crate::fetch::{DEFAULT_DELAY, DEFAULT_MAX_RETRIES, RetryConfig, RetryingFetcher};
use crate::models::CrawlSummary;
use crate::traits::{Fetcher, Parser, RecordSink};
use crate::walker::{CrawlAccumulator, KeyEnd, PaginationWalker};

pub const DEFAULT_BASE_URL: &str = "http://ufcstats.com/statistics/fighters";

/// Records collected before test mode stops the crawl.
pub const DEFAULT_TEST_CAP: usize = 5;

/// Crawl settings, passed to [`Crawler::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Listing endpoint; pages are requested as `<base_url>?char=<key>&page=<n>`.
    pub base_url: String,
    /// Index keys, walked in order. Defaults to `a` through `z`.
    pub keys: Vec<String>,
    /// Attempts per URL.
    pub max_retries: u32,
    /// Sleep after every successful request.
    pub delay: Duration,
    /// Stop once `test_cap` records are collected.
    pub test_mode: bool,
    pub test_cap: usize,
    /// Optional bound on listing pages per key.
    pub max_pages_per_key: Option<u32>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            keys: ('a'..='z').map(String::from).collect(),
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_DELAY,
            test_mode: false,
            test_cap: DEFAULT_TEST_CAP,
            max_pages_per_key: None,
        }
    }
}

impl CrawlConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_test_cap(mut self, test_cap: usize) -> Self {
        self.test_cap = test_cap;
        self
    }

    pub fn with_max_pages_per_key(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages_per_key = max_pages;
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries, self.delay)
    }

    /// The record cap in effect, if any.
    pub fn cap(&self) -> Option<usize> {
        self.test_mode.then_some(self.test_cap)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl(format!(
                "URL scheme '{}' is not allowed (only http/https)",
                url.scheme()
            )));
        }
        if self.keys.is_empty() {
            return Err(AppError::InvalidUrl("no index keys configured".into()));
        }
        Ok(())
    }
}

/// Drives the pagination walker across every index key and hands the
/// collected records to a sink.
///
/// Generic over the transport and the HTML parser, so tests run without
/// network access.
pub struct Crawler<F, P>
where
    F: Fetcher,
    P: Parser,
{
    walker: PaginationWalker<F, P>,
    config: CrawlConfig,
}

impl<F, P> Crawler<F, P>
where
    F: Fetcher,
    P: Parser,
{
    pub fn new(fetcher: F, parser: P, config: CrawlConfig) -> Result<Self, AppError> {
        config.validate()?;
        let walker = PaginationWalker::new(
            RetryingFetcher::new(fetcher, config.retry_config()),
            parser,
            config.base_url.clone(),
        )
        .with_cap(config.cap())
        .with_max_pages(config.max_pages_per_key);

        Ok(Self { walker, config })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawl every key, then write all records to `sink` in one batch.
    ///
    /// Fetch and extraction failures are absorbed along the way; only a sink
    /// failure is returned.
    pub async fn run<S: RecordSink>(&self, sink: &S) -> Result<CrawlSummary, AppError> {
        let cap = self.config.cap();
        let mut acc = CrawlAccumulator::new();
        let mut summary = CrawlSummary::default();

        for key in &self.config.keys {
            if acc.reached(cap) {
                break;
            }
            let outcome = self.walker.walk_key(key, &mut acc).await;
            summary.keys_visited += 1;
            summary.pages_fetched += outcome.pages_fetched;
            summary.detail_failures += outcome.detail_failures;
            if outcome.end == KeyEnd::Capped {
                break;
            }
        }

        summary.capped = acc.reached(cap);
        summary.records = acc.len();
        if acc.is_empty() {
            tracing::warn!(keys = summary.keys_visited, "No fighters collected");
        }

        sink.write(acc.records())?;
        tracing::info!(
            records = summary.records,
            keys = summary.keys_visited,
            pages = summary.pages_fetched,
            failures = summary.detail_failures,
            "Fighters data saved to {}",
            sink.location()
        );

        Ok(summary)
    }
}
