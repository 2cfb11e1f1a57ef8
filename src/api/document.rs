use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::fields::{
    child_object, collapse_whitespace, first_text, first_value, normalize_date, one_or_many, text_or_empty, Candidates,
};
use super::nlic::canonical_url;
use super::types::{document_id, DocumentStatus, DocumentType, ParsedDocument, ParsedProvision};
use crate::error::{KolexError, Result};

const ROOT: Candidates = &["법령", "Law", "law"];
const BASIC_INFO: Candidates = &["기본정보", "basicInfo"];
const TITLE: Candidates = &["법령명_한글", "법령명한글", "lawNameKorean"];
const TITLE_EN: Candidates = &["법령명_영문", "법령명영문", "lawNameEnglish"];
const LAW_NUMBER: Candidates = &["공포번호", "promulgationNumber"];
const ISSUED_DATE: Candidates = &["공포일자", "promulgationDate"];
const EFFECTIVE_DATE: Candidates = &["시행일자", "enforcementDate"];
const TYPE_HINT: Candidates = &["법종구분", "법령구분명", "법종구분명", "lawType"];

const ARTICLES: Candidates = &["조문", "articles"];
const ARTICLE_UNITS: Candidates = &["조문단위", "articleUnit"];
const ARTICLE_KIND: Candidates = &["조문여부", "articleKind"];
const ARTICLE_NUMBER: Candidates = &["조문번호", "articleNumber"];
const ARTICLE_TITLE: Candidates = &["조문제목", "articleTitle"];
const ARTICLE_CONTENT: Candidates = &["조문내용", "articleContent"];
const ARTICLE_CONTENT_EN: Candidates = &["조문내용_영문", "articleContentEnglish"];
const ARTICLE_KEY: Candidates = &["조문키", "articleKey"];
const ARTICLE_EFFECTIVE: Candidates = &["조문시행일자", "articleEnforcementDate"];
const ARTICLE_AMENDMENT: Candidates = &["조문제개정유형", "articleAmendmentType"];

const PARAGRAPHS: Candidates = &["항", "paragraphs"];
const PARAGRAPH_CONTENT: Candidates = &["항내용", "paragraphContent"];
const ITEMS: Candidates = &["호", "items"];
const ITEM_CONTENT: Candidates = &["호내용", "itemContent"];

/// Marker of an article unit that is a chapter heading rather than an article
const HEADING_KIND: &str = "전문";

/// Characters meaning "No." and "Article" around an article number
const ARTICLE_MARKERS: [char; 2] = ['제', '조'];

const SHORT_NAME_MAX_CHARS: usize = 30;

/// Known abbreviations keyed by exact Korean title
const SHORT_NAMES: &[(&str, &str)] = &[
    ("개인정보 보호법", "PIPA"),
    ("개인정보 보호법 시행령", "PIPA 시행령"),
    ("개인정보 보호법 시행규칙", "PIPA 시행규칙"),
    ("정보통신망 이용촉진 및 정보보호 등에 관한 법률", "정보통신망법"),
    ("정보통신망 이용촉진 및 정보보호 등에 관한 법률 시행령", "정보통신망법 시행령"),
    ("신용정보의 이용 및 보호에 관한 법률", "신용정보법"),
    ("신용정보의 이용 및 보호에 관한 법률 시행령", "신용정보법 시행령"),
    ("위치정보의 보호 및 이용 등에 관한 법률", "위치정보법"),
    ("전자금융거래법", "전자금융거래법"),
    ("전자서명법", "전자서명법"),
    ("전자정부법", "전자정부법"),
    ("정보보호산업의 진흥에 관한 법률", "정보보호산업법"),
    ("클라우드컴퓨팅 발전 및 이용자 보호에 관한 법률", "클라우드컴퓨팅법"),
    ("데이터 산업진흥 및 이용촉진에 관한 기본법", "데이터산업법"),
];

/// Parse the full content of one law into a seed document
pub fn parse_document(raw: &str, source_id: &str) -> Result<ParsedDocument> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| KolexError::Parse(format!("law {} is not valid JSON: {}", source_id, e)))?;
    let top = value
        .as_object()
        .ok_or_else(|| KolexError::Parse(format!("law {} root is not an object", source_id)))?;
    let law = child_object(top, ROOT)
        .ok_or_else(|| KolexError::Parse(format!("law {} has no law element", source_id)))?;
    let info = child_object(law, BASIC_INFO).unwrap_or(law);

    let title = first_text(info, TITLE)
        .map(|t| collapse_whitespace(&t))
        .ok_or_else(|| KolexError::Parse(format!("law {} has no Korean title", source_id)))?;
    let title_en = first_text(info, TITLE_EN).map(|t| collapse_whitespace(&t));
    let law_number = text_or_empty(info, LAW_NUMBER).trim().to_string();
    let type_hint = text_or_empty(info, TYPE_HINT);

    Ok(ParsedDocument {
        id: document_id(&law_number, source_id),
        document_type: infer_document_type(&type_hint, &title),
        short_name: short_name(&title),
        title,
        title_en,
        law_number,
        status: DocumentStatus::InForce,
        issued_date: normalize_date(&text_or_empty(info, ISSUED_DATE)),
        effective_date: normalize_date(&text_or_empty(info, EFFECTIVE_DATE)),
        canonical_url: canonical_url(source_id),
        provisions: parse_provisions(law),
    })
}

/// Best-effort classification from the upstream category string.
///
/// Falls back to the title suffix when upstream sends no category.
pub fn infer_document_type(hint: &str, title: &str) -> DocumentType {
    let subject = if hint.trim().is_empty() { title } else { hint };

    if subject.contains("대통령령") || subject.contains("시행령") {
        DocumentType::PresidentialDecree
    } else if subject.contains("총리령") || subject.contains("부령") || subject.contains("시행규칙") {
        DocumentType::MinisterialOrdinance
    } else {
        DocumentType::Statute
    }
}

/// Display abbreviation for a title; unknown titles are truncated
pub fn short_name(title: &str) -> String {
    SHORT_NAMES
        .iter()
        .find(|(full, _)| *full == title)
        .map(|(_, short)| short.to_string())
        .unwrap_or_else(|| title.chars().take(SHORT_NAME_MAX_CHARS).collect())
}

/// Strip the article markers, keeping any sub-numbering suffix verbatim
pub fn strip_article_markers(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !ARTICLE_MARKERS.contains(c)).collect();
    stripped.trim().to_string()
}

/// `15` renders as `제15조`, a bis article `15의2` as `제15조의2`
pub fn section_label(number: &str) -> String {
    match number.split_once('의') {
        Some((base, suffix)) => format!("제{}조의{}", base, suffix),
        None => format!("제{}조", number),
    }
}

fn parse_provisions(law: &Map<String, Value>) -> Vec<ParsedProvision> {
    let units = match child_object(law, ARTICLES) {
        Some(articles) => one_or_many(first_value(articles, ARTICLE_UNITS)),
        None => one_or_many(first_value(law, ARTICLES)),
    };

    let mut provisions = Vec::new();
    let mut chapter: Option<String> = None;
    let mut unnumbered = 0;

    for unit in units {
        let content = flatten_article(unit);

        if first_text(unit, ARTICLE_KIND).as_deref().map(str::trim) == Some(HEADING_KIND) {
            if !content.is_empty() {
                chapter = Some(collapse_whitespace(&content));
            }
            continue;
        }

        let number = strip_article_markers(&text_or_empty(unit, ARTICLE_NUMBER));
        if number.is_empty() && content.is_empty() {
            continue;
        }

        let (provision_ref, section) = if number.is_empty() {
            unnumbered += 1;
            (format!("art-unnumbered-{}", unnumbered), String::new())
        } else {
            (format!("art-{}", number), section_label(&number))
        };

        let mut metadata = BTreeMap::new();
        if let Some(key) = first_text(unit, ARTICLE_KEY) {
            metadata.insert("article_key".to_string(), key.trim().to_string());
        }
        if let Some(date) = first_text(unit, ARTICLE_EFFECTIVE) {
            metadata.insert("effective_date".to_string(), normalize_date(&date));
        }
        if let Some(kind) = first_text(unit, ARTICLE_AMENDMENT) {
            metadata.insert("amendment".to_string(), kind.trim().to_string());
        }

        provisions.push(ParsedProvision {
            provision_ref,
            section,
            chapter: chapter.clone(),
            title: first_text(unit, ARTICLE_TITLE).map(|t| t.trim().to_string()),
            content,
            content_en: first_text(unit, ARTICLE_CONTENT_EN).map(|t| t.trim().to_string()),
            metadata,
        });
    }

    provisions
}

/// Article text, then each paragraph on its own line and each item indented below it
fn flatten_article(unit: &Map<String, Value>) -> String {
    let mut content = text_or_empty(unit, ARTICLE_CONTENT).trim().to_string();

    for paragraph in one_or_many(first_value(unit, PARAGRAPHS)) {
        let text = text_or_empty(paragraph, PARAGRAPH_CONTENT);
        let text = text.trim();
        if !text.is_empty() {
            push_line(&mut content, text);
        }

        for item in one_or_many(first_value(paragraph, ITEMS)) {
            let text = text_or_empty(item, ITEM_CONTENT);
            let text = text.trim();
            if !text.is_empty() {
                push_line(&mut content, &format!("  {}", text));
            }
        }
    }

    content
}

fn push_line(content: &mut String, line: &str) {
    if !content.is_empty() {
        content.push('\n');
    }
    content.push_str(line);
}
