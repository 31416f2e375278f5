pub mod crawl;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod index;
pub mod models;
pub mod traits;
pub mod walker;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use crawl::{CrawlConfig, Crawler};
pub use error::AppError;
pub use models::{CrawlSummary, FetchResult, FighterLink, FighterRecord};
pub use traits::{Document, Element, Fetcher, Parser, RecordSink};
