//! Detection of upstream documents missing from the built store.

use log::info;
use serde::Serialize;
use std::path::Path;

use crate::api::types::LawIndexEntry;
use crate::api::{Fetch, NlicEndpoints};
use crate::error::Result;
use crate::ingest::{discover, FailurePolicy, DRIFT_TERMS};
use crate::store;

/// Outcome of one drift check
#[derive(Debug, Clone, Default, Serialize)]
pub struct DriftReport {
    /// Documents in the local store
    pub local_documents: usize,
    /// Entries returned by the narrowed discovery pass
    pub checked: usize,
    /// Discovered entries whose document id is absent locally
    pub new_entries: Vec<LawIndexEntry>,
}

impl DriftReport {
    pub fn has_updates(&self) -> bool {
        !self.new_entries.is_empty()
    }

    /// 0 when up to date, 1 when new documents exist upstream
    pub fn exit_code(&self) -> u8 {
        if self.has_updates() {
            1
        } else {
            0
        }
    }
}

/// Exit code used when the check itself could not complete
pub const CHECK_FAILED_EXIT_CODE: u8 = 2;

/// Run the drift discovery terms against the store at `db_path`.
///
/// Only new document ids are reported; existing documents are not compared.
/// The store is opened read-only in effect and never written.
pub async fn check_for_updates(
    fetcher: &dyn Fetch,
    endpoints: &NlicEndpoints,
    db_path: &Path,
    max_retries: u32,
) -> Result<DriftReport> {
    let local = {
        let conn = store::open_existing(db_path)?;
        store::document_ids(&conn)?
    };
    info!("{} documents in {}", local.len(), db_path.display());

    let discovered = discover(fetcher, endpoints, DRIFT_TERMS, max_retries, FailurePolicy::Abort).await?;
    let checked = discovered.len();

    let new_entries: Vec<LawIndexEntry> = discovered
        .into_iter()
        .filter(|entry| !local.contains(&entry.document_id()))
        .collect();

    info!("{} of {} discovered entries are new", new_entries.len(), checked);
    Ok(DriftReport {
        local_documents: local.len(),
        checked,
        new_entries,
    })
}
