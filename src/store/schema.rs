use rusqlite::Connection;

use crate::error::Result;

/// Bump whenever a table or column the query tools read changes
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA: &str = r#"
CREATE TABLE documents (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL CHECK (type IN ('statute', 'presidential_decree', 'ministerial_ordinance')),
    title TEXT NOT NULL,
    title_en TEXT,
    short_name TEXT,
    law_number TEXT,
    status TEXT NOT NULL DEFAULT 'in_force'
        CHECK (status IN ('in_force', 'amended', 'repealed', 'not_yet_in_force')),
    issued_date TEXT,
    effective_date TEXT,
    url TEXT
);

CREATE TABLE provisions (
    id INTEGER PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents(id),
    provision_ref TEXT NOT NULL,
    chapter TEXT,
    section TEXT NOT NULL,
    title TEXT,
    content TEXT NOT NULL,
    metadata TEXT,
    UNIQUE (document_id, provision_ref)
);

CREATE INDEX idx_provisions_document ON provisions(document_id);

CREATE VIRTUAL TABLE provisions_fts USING fts5(
    content, title,
    content='provisions',
    content_rowid='id',
    tokenize='unicode61'
);

CREATE TRIGGER provisions_ai AFTER INSERT ON provisions BEGIN
    INSERT INTO provisions_fts(rowid, content, title)
    VALUES (new.id, new.content, new.title);
END;

CREATE TRIGGER provisions_ad AFTER DELETE ON provisions BEGIN
    INSERT INTO provisions_fts(provisions_fts, rowid, content, title)
    VALUES ('delete', old.id, old.content, old.title);
END;

CREATE TRIGGER provisions_au AFTER UPDATE ON provisions BEGIN
    INSERT INTO provisions_fts(provisions_fts, rowid, content, title)
    VALUES ('delete', old.id, old.content, old.title);
    INSERT INTO provisions_fts(rowid, content, title)
    VALUES (new.id, new.content, new.title);
END;

CREATE TABLE provision_translations (
    provision_id INTEGER NOT NULL REFERENCES provisions(id),
    language TEXT NOT NULL,
    content TEXT NOT NULL,
    PRIMARY KEY (provision_id, language)
);

CREATE TABLE cross_references (
    id INTEGER PRIMARY KEY,
    source_document_id TEXT NOT NULL REFERENCES documents(id),
    source_provision_ref TEXT,
    target_document_id TEXT NOT NULL REFERENCES documents(id),
    target_provision_ref TEXT,
    ref_type TEXT NOT NULL
);

CREATE INDEX idx_cross_references_source ON cross_references(source_document_id);
CREATE INDEX idx_cross_references_target ON cross_references(target_document_id);

CREATE TABLE external_documents (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    short_name TEXT,
    url TEXT
);

CREATE TABLE external_references (
    id INTEGER PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents(id),
    provision_ref TEXT,
    external_document_id TEXT NOT NULL REFERENCES external_documents(id),
    reference_type TEXT NOT NULL,
    confidence TEXT,
    UNIQUE (document_id, provision_ref, external_document_id, reference_type)
);

CREATE INDEX idx_external_references_external ON external_references(external_document_id);

CREATE TABLE db_metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Create every table, index and trigger on a fresh database
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
