pub mod document;
pub mod fetcher;
pub mod sink;

pub use document::{ScraperDocument, ScraperElement, ScraperParser};
pub use fetcher::ReqwestFetcher;
pub use sink::{CsvSink, JsonSink};
