#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use kolex::api::{Fetch, FetchResponse};
use kolex::error::{KolexError, Result};

/// Canned reply for one scripted URL
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    /// Retries exhausted on a 503
    Exhausted,
}

/// In-memory fetcher routing listing requests by `query` and law requests by `MST`
#[derive(Default)]
pub struct ScriptedFetch {
    listings: HashMap<String, Vec<Reply>>,
    laws: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages returned for a search term, in page order
    pub fn listing(mut self, term: &str, pages: Vec<Reply>) -> Self {
        self.listings.insert(term.to_string(), pages);
        self
    }

    pub fn law(mut self, source_id: &str, reply: Reply) -> Self {
        self.laws.insert(source_id.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Listing requests made for one search term
    pub fn listing_calls(&self, term: &str) -> usize {
        self.calls()
            .iter()
            .filter(|url| query_param(url, "query").as_deref() == Some(term))
            .count()
    }

    /// Content requests made, by MST
    pub fn law_calls(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|url| query_param(url, "MST"))
            .collect()
    }
}

fn query_param(url: &str, name: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[async_trait]
impl Fetch for ScriptedFetch {
    async fn fetch(&self, url: &str, _max_retries: u32) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());

        let reply = if let Some(source_id) = query_param(url, "MST") {
            self.laws
                .get(&source_id)
                .cloned()
                .unwrap_or(Reply::Status(404, String::new()))
        } else {
            let term = query_param(url, "query").unwrap_or_default();
            let page: usize = query_param(url, "page").and_then(|p| p.parse().ok()).unwrap_or(1);
            self.listings
                .get(&term)
                .and_then(|pages| pages.get(page - 1).cloned())
                .unwrap_or_else(|| Reply::Status(200, empty_listing()))
        };

        match reply {
            Reply::Status(status, body) => Ok(FetchResponse {
                status,
                body,
                content_type: Some("application/json".to_string()),
            }),
            Reply::Exhausted => Err(KolexError::RetriesExhausted {
                url: url.to_string(),
                status: 503,
                attempts: 4,
            }),
        }
    }
}

pub fn empty_listing() -> String {
    json!({"LawSearch": {"totalCnt": "0"}}).to_string()
}

/// `(title, source id, law number)` triples as one listing page
pub fn listing(entries: &[(&str, &str, &str)]) -> String {
    let laws: Vec<Value> = entries
        .iter()
        .map(|(title, source_id, law_number)| {
            json!({
                "법령명한글": title,
                "법령일련번호": source_id,
                "공포번호": law_number,
                "공포일자": "20230314",
                "시행일자": "20230915",
                "법령구분명": "법률"
            })
        })
        .collect();

    json!({"LawSearch": {"totalCnt": entries.len().to_string(), "law": laws}}).to_string()
}

/// One listing page of `count` laws with source ids counting up from `first_id`,
/// reporting `total` matches overall
pub fn listing_page(first_id: usize, count: usize, total: usize) -> String {
    let laws: Vec<Value> = (first_id..first_id + count)
        .map(|id| {
            json!({
                "법령명한글": format!("법률 제{}호", id),
                "법령일련번호": id.to_string(),
                "공포번호": id.to_string(),
                "법령구분명": "법률"
            })
        })
        .collect();

    json!({"LawSearch": {"totalCnt": total.to_string(), "law": laws}}).to_string()
}

/// Full law body with the given `(number, title, content)` articles
pub fn law(title: &str, law_number: &str, articles: &[(&str, &str, &str)]) -> String {
    let units: Vec<Value> = articles
        .iter()
        .map(|(number, article_title, content)| {
            json!({
                "조문여부": "조문",
                "조문번호": number,
                "조문제목": article_title,
                "조문내용": content
            })
        })
        .collect();

    json!({
        "법령": {
            "기본정보": {
                "법령명_한글": title,
                "공포번호": law_number,
                "공포일자": "20230314",
                "시행일자": "20230915",
                "법종구분": "법률"
            },
            "조문": {"조문단위": units}
        }
    })
    .to_string()
}
