use reqwest::Url;

use crate::error::{KolexError, Result};

/// Production host of the National Law Information Center
pub const DEFAULT_BASE_URL: &str = "https://www.law.go.kr";
const SEARCH_PATH: &str = "/DRF/lawSearch.do";
const SERVICE_PATH: &str = "/DRF/lawService.do";
const CANONICAL_URL: &str = "https://www.law.go.kr/lsInfoP.do";

/// Fixed listing page size; pagination math depends on it
pub const PAGE_SIZE: u32 = 100;

/// URL builder for the NLIC (국가법령정보센터) DRF endpoints
#[derive(Debug, Clone)]
pub struct NlicEndpoints {
    base_url: String,
    api_key: String,
}

impl NlicEndpoints {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Point the endpoints at another host (mock servers in tests)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Listing search for one term and 1-based page
    pub fn search_url(&self, query: &str, page: u32) -> Result<String> {
        let params = vec![
            ("OC", self.api_key.clone()),
            ("target", "law".to_string()),
            ("type", "JSON".to_string()),
            ("query", query.to_string()),
            ("display", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ];

        let url = Url::parse_with_params(&format!("{}{}", self.base_url, SEARCH_PATH), &params)
            .map_err(|e| KolexError::Parse(e.to_string()))?;
        Ok(url.to_string())
    }

    /// Full content of one law by its internal id
    pub fn law_url(&self, source_id: &str) -> Result<String> {
        let params = vec![
            ("OC", self.api_key.clone()),
            ("target", "law".to_string()),
            ("type", "JSON".to_string()),
            ("MST", source_id.to_string()),
        ];

        let url = Url::parse_with_params(&format!("{}{}", self.base_url, SERVICE_PATH), &params)
            .map_err(|e| KolexError::Parse(e.to_string()))?;
        Ok(url.to_string())
    }
}

/// Public page for a law, synthesized from its internal id
pub fn canonical_url(source_id: &str) -> String {
    format!("{}?lsiSeq={}", CANONICAL_URL, source_id)
}
