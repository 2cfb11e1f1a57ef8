//! Discovery and content phases of the ingestion pipeline.

pub mod discovery;
pub mod seeds;

use indicatif::ProgressBar;
use log::{info, warn};
use serde::Serialize;

use crate::api::client::DEFAULT_MAX_RETRIES;
use crate::api::document::{infer_document_type, short_name};
use crate::api::fields::normalize_date;
use crate::api::types::{is_safe_source_id, DocumentStatus, LawIndexEntry, ParsedDocument};
use crate::api::{parse_document, Fetch, NlicEndpoints};
use crate::error::Result;

pub use discovery::{dedup_entries, discover, FailurePolicy, DRIFT_TERMS, SEED_TERMS};
pub use seeds::SeedStore;

/// Ingestion run options
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Reuse the cached discovery index instead of querying upstream
    pub skip_discovery: bool,
    /// Process only the first N index entries
    pub limit: Option<usize>,
    /// Re-fetch documents whose seed is a provision-less stub
    pub retry_stubs: bool,
    pub max_retries: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            skip_discovery: false,
            limit: None,
            retry_stubs: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Running totals of one ingestion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub discovered: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub provisions: usize,
    /// `(source id, reason)` for every failed document
    pub failures: Vec<(String, String)>,
}

/// Outcome of ingesting one index entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryOutcome {
    Skipped,
    Written { provisions: usize },
    Stubbed,
    Failed(String),
}

/// Sequential driver of discovery and content fetching
pub struct Ingestor<'a> {
    fetcher: &'a dyn Fetch,
    endpoints: NlicEndpoints,
    seeds: SeedStore,
    spinner: Option<ProgressBar>,
    progress: Option<ProgressBar>,
}

impl<'a> Ingestor<'a> {
    pub fn new(fetcher: &'a dyn Fetch, endpoints: NlicEndpoints, seeds: SeedStore) -> Self {
        Self {
            fetcher,
            endpoints,
            seeds,
            spinner: None,
            progress: None,
        }
    }

    /// Show the given spinner while discovery runs
    pub fn with_spinner(mut self, spinner: Option<ProgressBar>) -> Self {
        self.spinner = spinner;
        self
    }

    /// Report content-phase progress on the given bar
    pub fn with_progress(mut self, progress: Option<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    pub fn seeds(&self) -> &SeedStore {
        &self.seeds
    }

    /// Run both phases. Per-document failures are counted, never raised.
    pub async fn run(&self, options: &IngestOptions) -> Result<IngestReport> {
        let entries = if options.skip_discovery {
            let entries = self.seeds.load_index()?;
            info!("Loaded {} entries from {}", entries.len(), self.seeds.index_path().display());
            entries
        } else {
            self.discover(options.max_retries).await?
        };

        let selected = match options.limit {
            Some(limit) => &entries[..limit.min(entries.len())],
            None => &entries[..],
        };

        let mut report = self.ingest_content(selected, options).await?;
        report.discovered = entries.len();
        Ok(report)
    }

    /// Discovery phase: query every seed term and persist the deduplicated index
    pub async fn discover(&self, max_retries: u32) -> Result<Vec<LawIndexEntry>> {
        let result = discover(
            self.fetcher,
            &self.endpoints,
            SEED_TERMS,
            max_retries,
            FailurePolicy::SkipTerm,
        )
        .await;
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }

        let entries = result?;
        self.seeds.save_index(&entries)?;
        Ok(entries)
    }

    /// Content phase over already discovered entries.
    ///
    /// Upstream and parse problems are counted per document; only a failure
    /// to write the seed directory aborts the run.
    pub async fn ingest_content(&self, entries: &[LawIndexEntry], options: &IngestOptions) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        if let Some(pb) = &self.progress {
            pb.set_length(entries.len() as u64);
        }

        for entry in entries {
            if let Some(pb) = &self.progress {
                pb.set_message(entry.title.clone());
            }

            report.processed += 1;
            match self.ingest_entry(entry, options).await? {
                EntryOutcome::Skipped => report.skipped += 1,
                EntryOutcome::Written { provisions } => report.provisions += provisions,
                EntryOutcome::Stubbed => {
                    report.failed += 1;
                    report
                        .failures
                        .push((entry.source_id.clone(), "not found upstream, stub written".to_string()));
                }
                EntryOutcome::Failed(reason) => {
                    report.failed += 1;
                    report.failures.push((entry.source_id.clone(), reason));
                }
            }

            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        info!(
            "Content phase: {} processed, {} skipped, {} failed, {} provisions",
            report.processed, report.skipped, report.failed, report.provisions
        );
        Ok(report)
    }

    async fn ingest_entry(&self, entry: &LawIndexEntry, options: &IngestOptions) -> Result<EntryOutcome> {
        let source_id = entry.source_id.as_str();
        if !is_safe_source_id(source_id) {
            warn!("{} has unusable id {:?}, not fetched", entry.title, source_id);
            return Ok(EntryOutcome::Failed(format!("unusable id {:?}", source_id)));
        }

        if self.seeds.exists(source_id) && !(options.retry_stubs && self.is_stub_seed(source_id)) {
            return Ok(EntryOutcome::Skipped);
        }

        let url = self.endpoints.law_url(source_id)?;
        let response = match self.fetcher.fetch(&url, options.max_retries).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetching {} ({}) failed: {}", entry.title, source_id, e);
                return Ok(EntryOutcome::Failed(e.to_string()));
            }
        };

        if response.is_not_found() {
            warn!("{} ({}) not found upstream, writing stub", entry.title, source_id);
            self.seeds.write(source_id, &stub_document(entry))?;
            return Ok(EntryOutcome::Stubbed);
        }

        if !response.is_ok() {
            warn!("{} ({}) returned status {}", entry.title, source_id, response.status);
            return Ok(EntryOutcome::Failed(format!("status {}", response.status)));
        }

        let document = match parse_document(&response.body, source_id) {
            Ok(document) => document,
            Err(e) => {
                warn!("Parsing {} ({}) failed: {}", entry.title, source_id, e);
                return Ok(EntryOutcome::Failed(e.to_string()));
            }
        };

        self.seeds.write(source_id, &document)?;
        Ok(EntryOutcome::Written {
            provisions: document.provisions.len(),
        })
    }

    fn is_stub_seed(&self, source_id: &str) -> bool {
        self.seeds.read(source_id).map(|doc| doc.is_stub()).unwrap_or(false)
    }
}

/// Placeholder seed for a document whose full text is not available
pub fn stub_document(entry: &LawIndexEntry) -> ParsedDocument {
    ParsedDocument {
        id: entry.document_id(),
        document_type: infer_document_type(&entry.document_type_hint, &entry.title),
        title: entry.title.clone(),
        title_en: None,
        short_name: short_name(&entry.title),
        law_number: entry.law_number.clone(),
        status: DocumentStatus::InForce,
        issued_date: normalize_date(&entry.promulgation_date),
        effective_date: normalize_date(&entry.effective_date),
        canonical_url: entry.canonical_url.clone(),
        provisions: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DocumentType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stub_document_carries_listing_metadata() {
        let entry = LawIndexEntry {
            title: "개인정보 보호법 시행령".to_string(),
            source_id: "251000".to_string(),
            law_number: "33723".to_string(),
            promulgation_date: "20230912".to_string(),
            effective_date: "20230915".to_string(),
            document_type_hint: String::new(),
            canonical_url: "https://www.law.go.kr/lsInfoP.do?lsiSeq=251000".to_string(),
        };

        let stub = stub_document(&entry);
        assert_eq!(stub.id, "act-33723");
        assert_eq!(stub.document_type, DocumentType::PresidentialDecree);
        assert_eq!(stub.short_name, "PIPA 시행령");
        assert_eq!(stub.issued_date, "2023-09-12");
        assert_eq!(stub.status, DocumentStatus::InForce);
        assert!(stub.is_stub());
    }

    #[test]
    fn test_default_options_fetch_everything() {
        let options = IngestOptions::default();
        assert!(!options.skip_discovery);
        assert!(!options.retry_stubs);
        assert_eq!(options.limit, None);
        assert_eq!(options.max_retries, DEFAULT_MAX_RETRIES);
    }
}
