//! Full rebuild of the queryable SQLite store from the seed directory.

pub mod dedup;
pub mod references;
pub mod schema;

use chrono::Utc;
use log::{debug, info, warn};
use rusqlite::{params, Connection, Transaction};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::types::ParsedDocument;
use crate::error::{KolexError, Result};
use crate::ingest::seeds::{list_seed_files, read_seed_file};

pub use dedup::dedup_provisions;
pub use schema::SCHEMA_VERSION;

const TIER: &str = "free";
const SOURCE: &str = "National Law Information Center (국가법령정보센터), https://www.law.go.kr";
const JURISDICTION: &str = "KR";

/// Row counts of one rebuild
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub seed_files: usize,
    pub documents: usize,
    pub provisions: usize,
    pub duplicates_dropped: usize,
    pub translations: usize,
    pub cross_references: usize,
    pub external_references: usize,
}

/// Rebuilds the store at `db_path` from every seed file in `seed_dir`
pub struct IndexBuilder {
    seed_dir: PathBuf,
    db_path: PathBuf,
}

impl IndexBuilder {
    pub fn new(seed_dir: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            seed_dir: seed_dir.into(),
            db_path: db_path.into(),
        }
    }

    /// Load all seeds in one transaction into a staging file, then swap it
    /// over `db_path`.
    ///
    /// A seed that fails to load rolls back the whole load and leaves any
    /// previously published store in place.
    pub fn build(&self) -> Result<BuildReport> {
        if let Some(parent) = self.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let staging = staging_path(&self.db_path);
        remove_database(&staging)?;

        let report = match self.build_into(&staging) {
            Ok(report) => report,
            Err(e) => {
                if let Err(cleanup) = remove_database(&staging) {
                    warn!("Could not remove {}: {}", staging.display(), cleanup);
                }
                return Err(e);
            }
        };

        remove_database(&self.db_path)?;
        fs::rename(&staging, &self.db_path)?;

        info!(
            "Built {}: {} documents, {} provisions ({} duplicates dropped)",
            self.db_path.display(),
            report.documents,
            report.provisions,
            report.duplicates_dropped
        );
        Ok(report)
    }

    fn build_into(&self, path: &Path) -> Result<BuildReport> {
        let mut conn = Connection::open(path)?;
        schema::create_schema(&conn)?;

        let seed_files = list_seed_files(&self.seed_dir)?;
        info!("Loading {} seed files from {}", seed_files.len(), self.seed_dir.display());

        let tx = conn.transaction()?;
        let mut report = load_seeds(&tx, &seed_files)?;
        tx.commit()?;

        finalize(&conn)?;
        report.seed_files = seed_files.len();
        Ok(report)
    }
}

/// `{db}.tmp` beside the published store
fn staging_path(db_path: &Path) -> PathBuf {
    sibling(db_path, ".tmp")
}

fn sibling(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Remove a database file together with its journal side files
fn remove_database(db_path: &Path) -> Result<()> {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let path = sibling(db_path, suffix);
        if path.exists() {
            debug!("Removing {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn load_seeds(tx: &Transaction, seed_files: &[PathBuf]) -> Result<BuildReport> {
    let mut report = BuildReport::default();
    // Document id -> whether the loaded seed carried provisions
    let mut loaded: HashMap<String, bool> = HashMap::new();

    references::seed_external_documents(tx)?;

    for path in seed_files {
        let document = read_seed_file(path)?;
        if document.id.trim().is_empty() || document.title.trim().is_empty() {
            return Err(KolexError::InvalidSeed {
                path: path.clone(),
                message: "document id and title are required".to_string(),
            });
        }

        let has_provisions = !document.is_stub();
        match loaded.get(&document.id) {
            Some(true) if !has_provisions => {
                warn!(
                    "{}: stub for {} ignored, a full seed was already loaded",
                    path.display(),
                    document.id
                );
                continue;
            }
            Some(_) => {
                warn!("{}: replaces the earlier seed for {}", path.display(), document.id);
                clear_provisions(tx, &document.id)?;
            }
            None => report.documents += 1,
        }
        loaded.insert(document.id.clone(), has_provisions);

        report.duplicates_dropped += insert_document(tx, document)?;
    }

    report.cross_references = references::link_implementing_documents(tx)?;
    report.external_references = references::link_external_references(tx)?;
    write_metadata(tx)?;

    // Replaced seeds leave no rows behind, so count what actually landed
    report.provisions = count_rows(tx, "SELECT COUNT(*) FROM provisions")?;
    report.translations = count_rows(tx, "SELECT COUNT(*) FROM provision_translations")?;
    Ok(report)
}

fn count_rows(tx: &Transaction, sql: &str) -> Result<usize> {
    let count: i64 = tx.query_row(sql, [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Drop everything an earlier seed loaded for `document_id`; triggers keep the FTS index in step
fn clear_provisions(tx: &Transaction, document_id: &str) -> Result<()> {
    tx.execute(
        "DELETE FROM provision_translations
         WHERE provision_id IN (SELECT id FROM provisions WHERE document_id = ?1)",
        params![document_id],
    )?;
    tx.execute("DELETE FROM provisions WHERE document_id = ?1", params![document_id])?;
    Ok(())
}

/// Returns the number of duplicate provisions dropped
fn insert_document(tx: &Transaction, document: ParsedDocument) -> Result<usize> {
    tx.execute(
        "INSERT INTO documents
             (id, type, title, title_en, short_name, law_number, status, issued_date, effective_date, url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
             type = excluded.type,
             title = excluded.title,
             title_en = excluded.title_en,
             short_name = excluded.short_name,
             law_number = excluded.law_number,
             status = excluded.status,
             issued_date = excluded.issued_date,
             effective_date = excluded.effective_date,
             url = excluded.url",
        params![
            document.id,
            document.document_type.as_str(),
            document.title,
            document.title_en,
            non_empty(&document.short_name),
            non_empty(&document.law_number),
            document.status.as_str(),
            non_empty(&document.issued_date),
            non_empty(&document.effective_date),
            non_empty(&document.canonical_url),
        ],
    )?;

    let (provisions, dropped) = dedup_provisions(document.provisions);
    let mut upsert = tx.prepare_cached(
        "INSERT INTO provisions (document_id, provision_ref, chapter, section, title, content, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(document_id, provision_ref) DO UPDATE SET
             chapter = excluded.chapter,
             section = excluded.section,
             title = excluded.title,
             content = excluded.content,
             metadata = excluded.metadata
         RETURNING id",
    )?;
    let mut translate = tx.prepare_cached(
        "INSERT OR REPLACE INTO provision_translations (provision_id, language, content) VALUES (?1, 'en', ?2)",
    )?;

    for provision in &provisions {
        let metadata = if provision.metadata.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&provision.metadata)?)
        };

        let provision_id: i64 = upsert.query_row(
            params![
                document.id,
                provision.provision_ref,
                provision.chapter,
                provision.section,
                provision.title,
                provision.content,
                metadata,
            ],
            |row| row.get(0),
        )?;

        if let Some(content_en) = provision.content_en.as_deref().filter(|c| !c.trim().is_empty()) {
            translate.execute(params![provision_id, content_en])?;
        }
    }

    Ok(dropped)
}

fn write_metadata(tx: &Transaction) -> Result<()> {
    let built_at = Utc::now().to_rfc3339();
    let schema_version = SCHEMA_VERSION.to_string();
    let entries = [
        ("tier", TIER),
        ("schema_version", schema_version.as_str()),
        ("built_at", built_at.as_str()),
        ("source", SOURCE),
        ("jurisdiction", JURISDICTION),
    ];

    let mut stmt = tx.prepare("INSERT OR REPLACE INTO db_metadata (key, value) VALUES (?1, ?2)")?;
    for (key, value) in entries {
        stmt.execute(params![key, value])?;
    }
    Ok(())
}

/// Switch to rollback-journal mode for read-only distribution, refresh statistics and compact
fn finalize(conn: &Connection) -> Result<()> {
    let mode: String = conn.query_row("PRAGMA journal_mode = DELETE", [], |row| row.get(0))?;
    debug!("journal_mode = {}", mode);
    conn.execute_batch("ANALYZE; VACUUM;")?;
    Ok(())
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Open a built store, failing when it does not exist
pub fn open_existing(db_path: &Path) -> Result<Connection> {
    if !db_path.is_file() {
        return Err(KolexError::StoreMissing(db_path.to_path_buf()));
    }
    Ok(Connection::open(db_path)?)
}

/// Every document id currently in the store
pub fn document_ids(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT id FROM documents")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(ids)
}
