use rusqlite::{params, Transaction};

use crate::error::Result;

/// Foreign instrument every store carries, keyed `{type}:{year}/{number}`
#[derive(Debug, Clone, Copy)]
pub struct ExternalDocument {
    pub id: &'static str,
    pub doc_type: &'static str,
    pub title: &'static str,
    pub short_name: &'static str,
    pub url: &'static str,
}

pub const EXTERNAL_DOCUMENTS: &[ExternalDocument] = &[
    ExternalDocument {
        id: "regulation:2016/679",
        doc_type: "regulation",
        title: "Regulation (EU) 2016/679 on the protection of natural persons with regard to the processing of personal data",
        short_name: "GDPR",
        url: "https://eur-lex.europa.eu/eli/reg/2016/679/oj",
    },
    ExternalDocument {
        id: "directive:2002/58",
        doc_type: "directive",
        title: "Directive 2002/58/EC concerning the processing of personal data and the protection of privacy in the electronic communications sector",
        short_name: "ePrivacy Directive",
        url: "https://eur-lex.europa.eu/eli/dir/2002/58/oj",
    },
    ExternalDocument {
        id: "directive:1995/46",
        doc_type: "directive",
        title: "Directive 95/46/EC on the protection of individuals with regard to the processing of personal data",
        short_name: "Data Protection Directive",
        url: "https://eur-lex.europa.eu/eli/dir/1995/46/oj",
    },
];

/// Title marker that links a local document to one external instrument
#[derive(Debug, Clone, Copy)]
pub struct AutoLinkRule {
    pub title_marker: &'static str,
    pub title_en_marker: &'static str,
    pub external_document_id: &'static str,
    pub reference_type: &'static str,
    pub confidence: &'static str,
}

pub const AUTO_LINK_RULES: &[AutoLinkRule] = &[AutoLinkRule {
    title_marker: "개인정보 보호",
    title_en_marker: "Personal Information Protection",
    external_document_id: "regulation:2016/679",
    reference_type: "references",
    confidence: "partial",
}];

/// Title suffixes of implementing decrees/ordinances
const IMPLEMENTING_SUFFIXES: &[&str] = &[" 시행령", " 시행규칙"];

pub fn seed_external_documents(tx: &Transaction) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO external_documents (id, type, title, short_name, url) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for doc in EXTERNAL_DOCUMENTS {
        stmt.execute(params![doc.id, doc.doc_type, doc.title, doc.short_name, doc.url])?;
    }
    Ok(EXTERNAL_DOCUMENTS.len())
}

/// Apply the auto-link rules to every loaded document
pub fn link_external_references(tx: &Transaction) -> Result<usize> {
    let mut inserted = 0;
    for rule in AUTO_LINK_RULES {
        inserted += tx.execute(
            "INSERT OR IGNORE INTO external_references
                 (document_id, provision_ref, external_document_id, reference_type, confidence)
             SELECT id, NULL, ?1, ?2, ?3 FROM documents
             WHERE instr(title, ?4) > 0 OR instr(COALESCE(title_en, ''), ?5) > 0",
            params![
                rule.external_document_id,
                rule.reference_type,
                rule.confidence,
                rule.title_marker,
                rule.title_en_marker
            ],
        )?;
    }
    Ok(inserted)
}

/// Link each `X 시행령` / `X 시행규칙` to the local statute titled `X`
pub fn link_implementing_documents(tx: &Transaction) -> Result<usize> {
    let documents: Vec<(String, String)> = {
        let mut stmt = tx.prepare("SELECT id, title FROM documents ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<std::result::Result<_, _>>()?
    };

    let mut inserted = 0;
    let mut stmt = tx.prepare(
        "INSERT INTO cross_references
             (source_document_id, source_provision_ref, target_document_id, target_provision_ref, ref_type)
         VALUES (?1, NULL, ?2, NULL, 'implements')",
    )?;

    for (id, title) in &documents {
        let Some(base) = IMPLEMENTING_SUFFIXES.iter().find_map(|suffix| title.strip_suffix(suffix)) else {
            continue;
        };
        if let Some((target_id, _)) = documents.iter().find(|(_, t)| t.as_str() == base) {
            if target_id != id {
                stmt.execute(params![id, target_id])?;
                inserted += 1;
            }
        }
    }

    Ok(inserted)
}
