//! Fighter detail page extraction.

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{FighterRecord, RECORD_MARKER};
use crate::traits::{Document, Element};

pub const NAME_SELECTOR: &str = "span.b-content__title-highlight";
pub const RECORD_SELECTOR: &str = "span.b-content__title-record";
pub const INFO_SELECTOR: &str = "li.b-list__box-list-item";
pub const STAT_SELECTOR: &str = "li.b-list__box-list-item_type_block";

const RECORD_LABEL: &str = "Record: ";

/// Extract one fighter from a detail page.
///
/// Name and record are required: their absence means the page is not a
/// fighter detail page. Every other field falls back to an empty string.
pub fn extract_record<D: Document>(doc: &D) -> Result<FighterRecord, AppError> {
    let name = doc
        .select_first(NAME_SELECTOR)?
        .ok_or_else(|| AppError::ExtractionError("fighter name not found".into()))?
        .text();
    let record = doc
        .select_first(RECORD_SELECTOR)?
        .ok_or_else(|| AppError::ExtractionError("fighter record not found".into()))?
        .text();
    let record = record.replace(RECORD_LABEL, "");

    let info = key_values(doc, INFO_SELECTOR)?;
    let stats = key_values(doc, STAT_SELECTOR)?;
    let get = |map: &HashMap<String, String>, key: &str| map.get(key).cloned().unwrap_or_default();

    Ok(FighterRecord {
        name,
        record: format!("{RECORD_MARKER}{record}"),
        height: get(&info, "Height"),
        weight: get(&info, "Weight"),
        reach: get(&info, "Reach"),
        stance: get(&info, "STANCE"),
        dob: get(&info, "DOB"),
        slpm: get(&stats, "SLpM"),
        str_acc: get(&stats, "Str. Acc."),
        sapm: get(&stats, "SApM"),
        str_def: get(&stats, "Str. Def"),
        td_avg: get(&stats, "TD Avg."),
        td_acc: get(&stats, "TD Acc."),
        td_def: get(&stats, "TD Def."),
        sub_avg: get(&stats, "Sub. Avg."),
    })
}

/// Collect `key: value` blocks, split on the first colon. Blocks without a
/// colon are ignored; a repeated key keeps its last value.
fn key_values<D: Document>(doc: &D, selector: &str) -> Result<HashMap<String, String>, AppError> {
    Ok(doc
        .select(selector)?
        .iter()
        .filter_map(|block| split_pair(&block.text()))
        .collect())
}

fn split_pair(text: &str) -> Option<(String, String)> {
    let (key, value) = text.split_once(':')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}
