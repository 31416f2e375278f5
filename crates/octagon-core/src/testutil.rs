//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::detail::{INFO_SELECTOR, NAME_SELECTOR, RECORD_SELECTOR, STAT_SELECTOR};
use crate::error::AppError;
use crate::index::{CELL_SELECTOR, LINK_SELECTOR, ROW_SELECTOR};
use crate::models::FighterRecord;
use crate::traits::{Document, Element, Fetcher, Parser, RecordSink};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Fallback {
    Html(String),
    Error(String),
    NotFound,
}

/// Mock fetcher with a scripted response queue, URL routes and a fallback.
///
/// Each call first pops the queue; once it is empty the URL is looked up in
/// the routes, and anything else gets the fallback.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    routes: Arc<Mutex<HashMap<String, String>>>,
    fallback: Fallback,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    fn build(responses: Vec<Result<String, AppError>>, fallback: Fallback) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            routes: Arc::new(Mutex::new(HashMap::new())),
            fallback,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always returns `html`.
    pub fn new(html: &str) -> Self {
        Self::build(Vec::new(), Fallback::Html(html.to_string()))
    }

    /// Every call fails with a network error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self::build(Vec::new(), Fallback::Error(message.to_string()))
    }

    /// Pops `responses` in order, then returns a default page.
    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self::build(
            responses,
            Fallback::Html("<html><body>default</body></html>".to_string()),
        )
    }

    /// Serves `routes` by exact URL; unknown URLs get an HTTP 404 error.
    pub fn with_routes<I, K, V>(routes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fetcher = Self::build(Vec::new(), Fallback::NotFound);
        fetcher
            .routes
            .lock()
            .unwrap()
            .extend(routes.into_iter().map(|(k, v)| (k.into(), v.into())));
        fetcher
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            return responses.remove(0);
        }
        if let Some(html) = self.routes.lock().unwrap().get(url) {
            return Ok(html.clone());
        }
        match &self.fallback {
            Fallback::Html(html) => Ok(html.clone()),
            Fallback::Error(message) => Err(AppError::NetworkError(message.clone())),
            Fallback::NotFound => Err(AppError::HttpError(format!("HTTP 404 for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// MockParser / MockDocument
// ---------------------------------------------------------------------------

/// A canned element: text, attributes and children keyed by the selector
/// that finds them.
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    text: String,
    attrs: HashMap<String, String>,
    children: Vec<(String, MockNode)>,
}

impl MockNode {
    pub fn leaf(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn cell(text: &str) -> Self {
        Self::leaf(text)
    }

    pub fn anchor(href: &str) -> Self {
        Self::leaf("").with_attr("href", href)
    }

    /// A table row with the given cells.
    pub fn row(cells: Vec<MockNode>) -> Self {
        cells
            .into_iter()
            .fold(Self::default(), |row, cell| row.with_child(CELL_SELECTOR, cell))
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, selector: &str, child: MockNode) -> Self {
        self.children.push((selector.to_string(), child));
        self
    }
}

impl<'a> Element for &'a MockNode {
    fn select(&self, selector: &str) -> Result<Vec<Self>, AppError> {
        let node: &'a MockNode = *self;
        Ok(node
            .children
            .iter()
            .filter(|(key, _)| key == selector)
            .map(|(_, child)| child)
            .collect())
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.get(name).cloned()
    }
}

/// A document that answers selectors from canned root nodes.
#[derive(Debug, Clone, Default)]
pub struct MockDocument {
    roots: Vec<(String, MockNode)>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, selector: &str, node: MockNode) -> Self {
        self.roots.push((selector.to_string(), node));
        self
    }

    pub fn with_text_root(self, selector: &str, text: &str) -> Self {
        self.with_root(selector, MockNode::leaf(text))
    }

    /// A listing page: header row plus one two-cell row per link.
    pub fn index_page(hrefs: &[&str]) -> Self {
        hrefs.iter().fold(Self::with_header(), |doc, href| {
            let row = MockNode::row(vec![MockNode::cell("First"), MockNode::cell("Last")])
                .with_child(LINK_SELECTOR, MockNode::anchor(href));
            doc.with_root(ROW_SELECTOR, row)
        })
    }

    /// A listing page whose rows have cells but no anchors.
    pub fn index_page_without_links(rows: usize) -> Self {
        (0..rows).fold(Self::with_header(), |doc, _| {
            doc.with_root(
                ROW_SELECTOR,
                MockNode::row(vec![MockNode::cell("--"), MockNode::cell("--")]),
            )
        })
    }

    fn with_header() -> Self {
        Self::new().with_root(ROW_SELECTOR, MockNode::row(vec![]))
    }

    /// A detail page with the required name and record nodes.
    pub fn fighter(name: &str, record: &str) -> Self {
        Self::new()
            .with_text_root(NAME_SELECTOR, name)
            .with_text_root(RECORD_SELECTOR, record)
    }

    pub fn with_info(self, key: &str, value: &str) -> Self {
        self.with_raw_info(&format!("{key}:{value}"))
    }

    pub fn with_stat(self, key: &str, value: &str) -> Self {
        self.with_raw_stat(&format!("{key}:{value}"))
    }

    pub fn with_raw_info(self, text: &str) -> Self {
        self.with_text_root(INFO_SELECTOR, text)
    }

    pub fn with_raw_stat(self, text: &str) -> Self {
        self.with_text_root(STAT_SELECTOR, text)
    }
}

impl Document for MockDocument {
    type Element<'a> = &'a MockNode;

    fn select(&self, selector: &str) -> Result<Vec<&MockNode>, AppError> {
        Ok(self
            .roots
            .iter()
            .filter(|(key, _)| key == selector)
            .map(|(_, node)| node)
            .collect())
    }
}

/// Parser that maps exact HTML bodies to canned documents. Unknown bodies
/// parse to an empty document.
#[derive(Clone, Default)]
pub struct MockParser {
    documents: Arc<HashMap<String, MockDocument>>,
}

impl MockParser {
    pub fn new<I, K>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, MockDocument)>,
        K: Into<String>,
    {
        Self {
            documents: Arc::new(
                documents
                    .into_iter()
                    .map(|(k, doc)| (k.into(), doc))
                    .collect(),
            ),
        }
    }
}

impl Parser for MockParser {
    type Document = MockDocument;

    fn parse(&self, html: &str) -> MockDocument {
        self.documents.get(html).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Sink that keeps written batches in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    pub batches: Arc<Mutex<Vec<Vec<FighterRecord>>>>,
    error: Arc<Mutex<Option<AppError>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose first write fails with `error`.
    pub fn with_error(error: AppError) -> Self {
        Self {
            batches: Arc::default(),
            error: Arc::new(Mutex::new(Some(error))),
        }
    }

    /// All records written so far, across batches.
    pub fn records(&self) -> Vec<FighterRecord> {
        self.batches.lock().unwrap().concat()
    }
}

impl RecordSink for MemorySink {
    fn write(&self, records: &[FighterRecord]) -> Result<(), AppError> {
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        self.batches.lock().unwrap().push(records.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
