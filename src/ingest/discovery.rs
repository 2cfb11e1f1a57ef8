use log::{debug, info, warn};
use std::collections::HashSet;

use crate::api::types::{is_safe_source_id, LawIndexEntry, ListingPage};
use crate::api::{parse_listing, Fetch, NlicEndpoints};
use crate::error::{KolexError, Result};

/// Search terms covering the privacy and information-law corpus
pub const SEED_TERMS: &[&str] = &[
    "개인정보",
    "정보통신망",
    "신용정보",
    "위치정보",
    "전자정부",
    "정보보호",
    "전자금융거래",
    "전자서명",
    "클라우드컴퓨팅",
    "데이터 산업",
];

/// Narrower term list used by the update checker
pub const DRIFT_TERMS: &[&str] = &["개인정보", "정보통신망", "신용정보"];

/// Upper bound on listing pages requested per term
pub const MAX_PAGES_PER_TERM: u32 = 10;

/// What a failed listing request does to the discovery pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and move on to the next term
    SkipTerm,
    /// Fail the whole pass
    Abort,
}

/// Page through every term and return the deduplicated index
pub async fn discover(
    fetcher: &dyn Fetch,
    endpoints: &NlicEndpoints,
    terms: &[&str],
    max_retries: u32,
    policy: FailurePolicy,
) -> Result<Vec<LawIndexEntry>> {
    let mut collected = Vec::new();

    for term in terms {
        let found = match discover_term(fetcher, endpoints, term, max_retries).await {
            Ok(entries) => entries,
            Err((entries, e)) => {
                if policy == FailurePolicy::Abort {
                    return Err(e);
                }
                warn!("Discovery for '{}' stopped early: {}", term, e);
                entries
            }
        };
        info!("Discovered {} entries for '{}'", found.len(), term);
        collected.extend(found);
    }

    let entries = dedup_entries(collected);
    info!("Discovery index holds {} unique laws", entries.len());
    Ok(entries)
}

/// On failure the entries gathered before the failing page come back with the error
async fn discover_term(
    fetcher: &dyn Fetch,
    endpoints: &NlicEndpoints,
    term: &str,
    max_retries: u32,
) -> std::result::Result<Vec<LawIndexEntry>, (Vec<LawIndexEntry>, KolexError)> {
    let mut entries = Vec::new();

    for page in 1..=MAX_PAGES_PER_TERM {
        let listing = match fetch_page(fetcher, endpoints, term, page, max_retries).await {
            Ok(listing) => listing,
            Err(e) => return Err((entries, e)),
        };

        debug!(
            "'{}' page {}: {} entries of {}",
            term,
            page,
            listing.entries.len(),
            listing.total_count
        );
        entries.extend(listing.entries);

        if !listing.has_next_page {
            break;
        }
    }

    Ok(entries)
}

async fn fetch_page(
    fetcher: &dyn Fetch,
    endpoints: &NlicEndpoints,
    term: &str,
    page: u32,
    max_retries: u32,
) -> Result<ListingPage> {
    let url = endpoints.search_url(term, page)?;
    let response = fetcher.fetch(&url, max_retries).await?;
    if !response.is_ok() {
        return Err(KolexError::Other(format!(
            "listing for '{}' page {} returned status {}",
            term, page, response.status
        )));
    }
    parse_listing(&response.body, page)
}

/// Drop entries without a usable internal id and keep the first occurrence of each id
pub fn dedup_entries(entries: Vec<LawIndexEntry>) -> Vec<LawIndexEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            if entry.source_id.is_empty() {
                return false;
            }
            if !is_safe_source_id(&entry.source_id) {
                warn!("Dropping '{}': unusable id {:?}", entry.title, entry.source_id);
                return false;
            }
            seen.insert(entry.source_id.clone())
        })
        .collect()
}
