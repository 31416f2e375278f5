//! Per-key pagination over the alphabetical listing.
//!
//! # Page states
//!
//! ```text
//! FETCHING --[fetch failed]--------------------------------> TERMINATED
//!    |
//!    v
//! EVALUATING --[2 consecutive empty pages | cap | max pages]--> TERMINATED
//!    |
//!    +--[links scraped]--> CONTINUING (page += 1) --> FETCHING
//! ```
//!
//! A page is evaluated on two independent signals, rows with at least two
//! cells and resolvable detail links. Only a page showing both resets the
//! empty counter; any other page advances it by exactly one.

use crate::detail::extract_record;
use crate::error::AppError;
use crate::fetch::RetryingFetcher;
use crate::index::{IndexPage, PageSignals, extract_links};
use crate::models::{FetchResult, FighterLink, FighterRecord};
use crate::traits::{Fetcher, Parser};

/// Consecutive empty pages that end a key.
pub const EMPTY_PAGE_LIMIT: u32 = 2;

/// Position of the walker inside one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub key: String,
    pub page: u32,
    pub consecutive_empty: u32,
}

/// What the cursor decided after evaluating a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    Continue,
    Terminate,
}

impl PageCursor {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            page: 1,
            consecutive_empty: 0,
        }
    }

    /// Fold one page's signals into the empty counter.
    pub fn observe(&mut self, signals: PageSignals) -> CursorStep {
        match (signals.has_rows, signals.has_links) {
            (true, true) => self.consecutive_empty = 0,
            (false, true) => {
                tracing::debug!(key = %self.key, page = self.page, "Links found outside full rows");
                self.consecutive_empty += 1;
            }
            (true, false) => {
                tracing::debug!(key = %self.key, page = self.page, "Rows without resolvable links");
                self.consecutive_empty += 1;
            }
            (false, false) => {
                tracing::debug!(key = %self.key, page = self.page, "Empty page");
                self.consecutive_empty += 1;
            }
        }

        if self.consecutive_empty >= EMPTY_PAGE_LIMIT {
            CursorStep::Terminate
        } else {
            CursorStep::Continue
        }
    }

    pub fn advance(&mut self) {
        self.page += 1;
    }
}

/// Records collected so far, shared by every key of a crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlAccumulator {
    records: Vec<FighterRecord>,
}

impl CrawlAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FighterRecord) {
        self.records.push(record);
    }

    /// Running entity count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FighterRecord] {
        &self.records
    }

    /// True once `cap` is set and reached.
    pub fn reached(&self, cap: Option<usize>) -> bool {
        cap.is_some_and(|cap| self.records.len() >= cap)
    }
}

/// Why a key's traversal stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEnd {
    /// Two consecutive empty pages.
    Exhausted,
    /// A listing page could not be fetched or evaluated.
    PageUnavailable,
    /// The test-mode cap was reached.
    Capped,
    /// The per-key page limit was reached.
    PageLimit,
}

/// Statistics for one walked key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub end: KeyEnd,
    pub pages_fetched: usize,
    pub records_added: usize,
    pub detail_failures: usize,
}

/// Walks the listing pages of one index key at a time.
#[derive(Clone)]
pub struct PaginationWalker<F, P> {
    fetcher: RetryingFetcher<F>,
    parser: P,
    base_url: String,
    cap: Option<usize>,
    max_pages: Option<u32>,
}

impl<F, P> PaginationWalker<F, P>
where
    F: Fetcher,
    P: Parser,
{
    pub fn new(fetcher: RetryingFetcher<F>, parser: P, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            parser,
            base_url: base_url.into(),
            cap: None,
            max_pages: None,
        }
    }

    /// Stop once the accumulator holds `cap` records.
    pub fn with_cap(mut self, cap: Option<usize>) -> Self {
        self.cap = cap;
        self
    }

    /// Stop a key after `max_pages` listing pages.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn page_url(&self, key: &str, page: u32) -> String {
        format!("{}?char={}&page={}", self.base_url, key, page)
    }

    /// Walk every page of `key`, appending scraped fighters to `acc`.
    pub async fn walk_key(&self, key: &str, acc: &mut CrawlAccumulator) -> KeyOutcome {
        let mut cursor = PageCursor::new(key);
        let mut outcome = KeyOutcome {
            end: KeyEnd::Exhausted,
            pages_fetched: 0,
            records_added: 0,
            detail_failures: 0,
        };

        loop {
            if self.max_pages.is_some_and(|max| cursor.page > max) {
                tracing::warn!(%key, max_pages = ?self.max_pages, "Page limit reached, moving on");
                outcome.end = KeyEnd::PageLimit;
                break;
            }

            let url = self.page_url(key, cursor.page);
            let html = match self.fetcher.fetch(&url).await {
                FetchResult::Success(html) => html,
                FetchResult::Failure(_) => {
                    outcome.end = KeyEnd::PageUnavailable;
                    break;
                }
            };
            outcome.pages_fetched += 1;

            let page = match self.evaluate(&html) {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(%url, error = %e, "Could not evaluate listing page");
                    outcome.end = KeyEnd::PageUnavailable;
                    break;
                }
            };

            if cursor.observe(page.signals()) == CursorStep::Terminate {
                tracing::info!(
                    "No more fighters found for letter {}. Moving to next letter.",
                    key.to_uppercase()
                );
                outcome.end = KeyEnd::Exhausted;
                break;
            }

            for link in &page.links {
                match self.scrape_fighter(link).await {
                    Some(record) => {
                        acc.push(record);
                        outcome.records_added += 1;
                    }
                    None => outcome.detail_failures += 1,
                }
                if acc.reached(self.cap) {
                    break;
                }
            }

            if acc.reached(self.cap) {
                tracing::info!(records = acc.len(), "Record cap reached");
                outcome.end = KeyEnd::Capped;
                break;
            }

            tracing::info!(
                "Scraped fighters data for letter {}, page {}",
                key.to_uppercase(),
                cursor.page
            );
            cursor.advance();
        }

        outcome
    }

    fn evaluate(&self, html: &str) -> Result<IndexPage, AppError> {
        let doc = self.parser.parse(html);
        extract_links(&doc, &self.base_url)
    }

    /// Fetch and extract one fighter. Failures are logged and skipped.
    async fn scrape_fighter(&self, link: &FighterLink) -> Option<FighterRecord> {
        tracing::info!("Scraping fighter: {}", link);
        let html = match self.fetcher.fetch(link.as_str()).await {
            FetchResult::Success(html) => html,
            FetchResult::Failure(reason) => {
                tracing::warn!(url = %link, %reason, "Skipping fighter, page unavailable");
                return None;
            }
        };

        let doc = self.parser.parse(&html);
        match extract_record(&doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(url = %link, error = %e, "Skipping fighter, unexpected page structure");
                None
            }
        }
    }
}
