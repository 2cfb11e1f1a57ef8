use serde_json::{Map, Value};

use super::fields::{child_object, collapse_whitespace, first_text, first_value, one_or_many, text_or_empty, Candidates};
use super::nlic::{canonical_url, PAGE_SIZE};
use super::types::{LawIndexEntry, ListingPage};
use crate::error::{KolexError, Result};

const ROOT: Candidates = &["LawSearch", "lawSearch", "법령검색"];
const ENTRIES: Candidates = &["law", "법령", "laws"];
const TOTAL_COUNT: Candidates = &["totalCnt", "검색결과개수", "totalCount"];

const TITLE: Candidates = &["법령명한글", "lawNameKorean", "법령명", "lawName"];
const SOURCE_ID: Candidates = &["법령일련번호", "lawSerialNumber", "MST", "mst"];
const LAW_NUMBER: Candidates = &["공포번호", "promulgationNumber"];
const PROMULGATION_DATE: Candidates = &["공포일자", "promulgationDate"];
const EFFECTIVE_DATE: Candidates = &["시행일자", "enforcementDate"];
const TYPE_HINT: Candidates = &["법령구분명", "lawTypeName", "법종구분명", "lawType"];

/// Parse one page of a law listing response.
///
/// `page` is the 1-based page that was requested; together with the fixed
/// page size it gives the cumulative number of entries seen so far, which
/// decides whether another page is worth requesting.
pub fn parse_listing(raw: &str, page: u32) -> Result<ListingPage> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| KolexError::Parse(format!("listing is not valid JSON: {}", e)))?;
    let top = value
        .as_object()
        .ok_or_else(|| KolexError::Parse("listing root is not an object".to_string()))?;

    // Older responses put the fields directly at the top level
    let root = child_object(top, ROOT).unwrap_or(top);

    let total_count = first_text(root, TOTAL_COUNT)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0);

    let raw_entries = one_or_many(first_value(root, ENTRIES));
    let page_len = raw_entries.len() as u32;
    let entries: Vec<LawIndexEntry> = raw_entries.into_iter().filter_map(parse_entry).collect();

    let seen = page.saturating_sub(1) * PAGE_SIZE + page_len;
    let has_next_page = page_len >= PAGE_SIZE && seen < total_count;

    Ok(ListingPage {
        entries,
        total_count,
        has_next_page,
    })
}

/// Entries without a title are dropped; every other field defaults to empty
fn parse_entry(obj: &Map<String, Value>) -> Option<LawIndexEntry> {
    let title = collapse_whitespace(&first_text(obj, TITLE)?);
    if title.is_empty() {
        return None;
    }

    let source_id = text_or_empty(obj, SOURCE_ID).trim().to_string();
    let canonical_url = if source_id.is_empty() {
        String::new()
    } else {
        canonical_url(&source_id)
    };

    Some(LawIndexEntry {
        title,
        canonical_url,
        source_id,
        law_number: text_or_empty(obj, LAW_NUMBER).trim().to_string(),
        promulgation_date: text_or_empty(obj, PROMULGATION_DATE),
        effective_date: text_or_empty(obj, EFFECTIVE_DATE),
        document_type_hint: text_or_empty(obj, TYPE_HINT),
    })
}
