use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discovery-phase candidate from a law listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawIndexEntry {
    /// Korean title, whitespace-collapsed
    pub title: String,
    /// Upstream internal id (law serial number, `MST`)
    pub source_id: String,
    /// Official promulgation number, empty when upstream omits it
    #[serde(default)]
    pub law_number: String,
    #[serde(default)]
    pub promulgation_date: String,
    #[serde(default)]
    pub effective_date: String,
    /// Free-text upstream category, e.g. "법률" or "대통령령"
    #[serde(default)]
    pub document_type_hint: String,
    #[serde(default)]
    pub canonical_url: String,
}

impl LawIndexEntry {
    /// Document id this entry resolves to once ingested
    pub fn document_id(&self) -> String {
        document_id(&self.law_number, &self.source_id)
    }
}

/// Derive the store-wide document id.
///
/// Stub seeds and fully parsed seeds both go through here so a later full
/// fetch lands on the same row as an earlier stub.
pub fn document_id(law_number: &str, source_id: &str) -> String {
    let law_number = law_number.trim();
    if law_number.is_empty() {
        format!("act-{}", source_id.trim())
    } else {
        format!("act-{}", law_number)
    }
}

/// Whether an upstream id can name a seed file: one non-empty path component
/// of ASCII alphanumerics, `-` or `_`
pub fn is_safe_source_id(source_id: &str) -> bool {
    !source_id.is_empty()
        && source_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// One parsed listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub entries: Vec<LawIndexEntry>,
    pub total_count: u32,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Statute,
    PresidentialDecree,
    MinisterialOrdinance,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statute => "statute",
            Self::PresidentialDecree => "presidential_decree",
            Self::MinisterialOrdinance => "ministerial_ordinance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    InForce,
    Amended,
    Repealed,
    NotYetInForce,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InForce => "in_force",
            Self::Amended => "amended",
            Self::Repealed => "repealed",
            Self::NotYetInForce => "not_yet_in_force",
        }
    }
}

/// Canonical unit of legislation, written once per document as a seed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub id: String,
    pub document_type: DocumentType,
    /// Korean title (authoritative)
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub law_number: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub issued_date: String,
    #[serde(default)]
    pub effective_date: String,
    #[serde(default)]
    pub canonical_url: String,
    #[serde(default)]
    pub provisions: Vec<ParsedProvision>,
}

impl ParsedDocument {
    /// Placeholder written when full text is not available upstream
    pub fn is_stub(&self) -> bool {
        self.provisions.is_empty()
    }
}

/// One article-level unit with nested paragraph/item text flattened in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedProvision {
    /// Canonical key, e.g. `art-15`
    pub provision_ref: String,
    /// Display label, e.g. `제15조`
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_en: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_source_ids() {
        assert!(is_safe_source_id("248613"));
        assert!(is_safe_source_id("A-12_b"));
        for unsafe_id in ["", "12/3", "..", "../x", "a b", "12\\3", "법령"] {
            assert!(!is_safe_source_id(unsafe_id), "{unsafe_id:?} accepted");
        }
    }

    #[test]
    fn test_document_id_prefers_law_number() {
        assert_eq!(document_id("16930", "213257"), "act-16930");
        assert_eq!(document_id("", "213257"), "act-213257");
        assert_eq!(document_id("  ", "213257"), "act-213257");
    }

    #[test]
    fn test_seed_field_names() {
        let doc = ParsedDocument {
            id: "act-1".to_string(),
            document_type: DocumentType::PresidentialDecree,
            title: "개인정보 보호법 시행령".to_string(),
            title_en: None,
            short_name: "PIPA 시행령".to_string(),
            law_number: "1".to_string(),
            status: DocumentStatus::InForce,
            issued_date: "2020-08-04".to_string(),
            effective_date: "2020-08-05".to_string(),
            canonical_url: String::new(),
            provisions: vec![],
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["documentType"], "presidential_decree");
        assert_eq!(json["status"], "in_force");
        assert_eq!(json["shortName"], "PIPA 시행령");
        assert!(json.get("titleEn").is_none());
        assert!(json["provisions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_seed_with_missing_optional_fields_loads() {
        let json = r#"{
            "id": "act-9",
            "documentType": "statute",
            "title": "전자서명법",
            "titleEn": null,
            "provisions": [
                {"provisionRef": "art-1", "section": "제1조", "content": "목적", "chapter": null}
            ]
        }"#;

        let doc: ParsedDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.status, DocumentStatus::InForce);
        assert_eq!(doc.title_en, None);
        assert_eq!(doc.provisions[0].chapter, None);
        assert!(doc.provisions[0].metadata.is_empty());
    }
}
