use serde::{Deserialize, Serialize};

/// Prepended to the win-loss record so spreadsheet tools keep values like
/// `27-3-0` as text instead of coercing them into dates.
pub const RECORD_MARKER: char = '\'';

/// Outcome of a retried fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The response body.
    Success(String),
    /// Every attempt failed; holds the last error message.
    Failure(String),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }
}

/// Absolute URL of one fighter's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FighterLink(pub String);

impl FighterLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FighterLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One fighter, normalized to the fixed output schema.
///
/// Every field is always present; values missing from the source page are
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// Win-loss-draw summary, prefixed with [`RECORD_MARKER`].
    #[serde(rename = "Record")]
    pub record: String,
    #[serde(rename = "Height")]
    pub height: String,
    #[serde(rename = "Weight")]
    pub weight: String,
    #[serde(rename = "Reach")]
    pub reach: String,
    #[serde(rename = "Stance")]
    pub stance: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    #[serde(rename = "SLpM")]
    pub slpm: String,
    #[serde(rename = "Str. Acc.")]
    pub str_acc: String,
    #[serde(rename = "SApM")]
    pub sapm: String,
    #[serde(rename = "Str. Def")]
    pub str_def: String,
    #[serde(rename = "TD Avg.")]
    pub td_avg: String,
    #[serde(rename = "TD Acc.")]
    pub td_acc: String,
    #[serde(rename = "TD Def.")]
    pub td_def: String,
    #[serde(rename = "Sub. Avg.")]
    pub sub_avg: String,
}

impl FighterRecord {
    /// Output column names, in order.
    pub const COLUMNS: [&'static str; 15] = [
        "Name",
        "Record",
        "Height",
        "Weight",
        "Reach",
        "Stance",
        "DOB",
        "SLpM",
        "Str. Acc.",
        "SApM",
        "Str. Def",
        "TD Avg.",
        "TD Acc.",
        "TD Def.",
        "Sub. Avg.",
    ];

    /// Field values in [`COLUMNS`](Self::COLUMNS) order.
    pub fn values(&self) -> [&str; 15] {
        [
            self.name.as_str(),
            self.record.as_str(),
            self.height.as_str(),
            self.weight.as_str(),
            self.reach.as_str(),
            self.stance.as_str(),
            self.dob.as_str(),
            self.slpm.as_str(),
            self.str_acc.as_str(),
            self.sapm.as_str(),
            self.str_def.as_str(),
            self.td_avg.as_str(),
            self.td_acc.as_str(),
            self.td_def.as_str(),
            self.sub_avg.as_str(),
        ]
    }

    /// `(column, value)` pairs in output order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Self::COLUMNS.into_iter().zip(self.values())
    }

    /// The record string without the spreadsheet marker.
    pub fn record_text(&self) -> &str {
        self.record
            .strip_prefix(RECORD_MARKER)
            .unwrap_or(&self.record)
    }
}

/// Totals reported at the end of a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub records: usize,
    pub keys_visited: usize,
    pub pages_fetched: usize,
    /// Detail pages that could not be fetched or extracted.
    pub detail_failures: usize,
    /// True when test mode stopped the crawl at its cap.
    pub capped: bool,
}
