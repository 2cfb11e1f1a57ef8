pub mod build;
pub mod check;
pub mod config;
pub mod ingest;
pub mod version;

use log::warn;

use crate::api::client::RateLimitedClient;
use crate::api::NlicEndpoints;
use crate::config::Config;
use crate::error::Result;

/// Resolve the API key (flag or env first, then config file) and build the
/// upstream client. A missing key only warns.
pub(crate) fn upstream(config: &Config, api_key: Option<String>) -> Result<(RateLimitedClient, NlicEndpoints)> {
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| config.law.key.clone())
        .unwrap_or_default();

    let endpoints = NlicEndpoints::new(api_key);
    if !endpoints.has_api_key() {
        warn!("No API key configured (--api-key, LAW_API_KEY or `kolex config set law.key`); requests may be rejected");
    }

    let client = RateLimitedClient::new(config.client_config())?;
    Ok((client, endpoints))
}
