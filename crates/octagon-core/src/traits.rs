use std::future::Future;

use crate::error::AppError;
use crate::models::FighterRecord;

/// Fetches raw HTML content from a URL.
///
/// One call is one transport attempt; retrying and rate limiting are layered
/// on top by [`RetryingFetcher`](crate::fetch::RetryingFetcher).
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Turns raw HTML into a queryable [`Document`].
pub trait Parser: Send + Sync + Clone {
    type Document: Document;

    fn parse(&self, html: &str) -> Self::Document;
}

/// A parsed page that can be queried with CSS selectors.
pub trait Document {
    type Element<'a>: Element
    where
        Self: 'a;

    /// All elements matching `selector`, in document order.
    fn select(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, AppError>;

    /// The first element matching `selector`, if any.
    fn select_first(&self, selector: &str) -> Result<Option<Self::Element<'_>>, AppError> {
        Ok(self.select(selector)?.into_iter().next())
    }
}

/// One element of a [`Document`].
pub trait Element: Sized {
    /// Descendants of this element matching `selector`, in document order.
    fn select(&self, selector: &str) -> Result<Vec<Self>, AppError>;

    fn select_first(&self, selector: &str) -> Result<Option<Self>, AppError> {
        Ok(self.select(selector)?.into_iter().next())
    }

    /// Visible text: every text node trimmed, empty ones dropped, the rest
    /// concatenated.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;
}

/// Receives the finished record set once, at the end of a crawl.
pub trait RecordSink {
    fn write(&self, records: &[FighterRecord]) -> Result<(), AppError>;

    /// Human-readable output location, used in the completion log line.
    fn location(&self) -> String;
}
