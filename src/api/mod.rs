//! Upstream access and parsing for the National Law Information Center.

pub mod client;
pub mod document;
pub mod fields;
pub mod listing;
pub mod nlic;
pub mod types;

pub use client::{ClientConfig, Fetch, FetchResponse, RateLimitedClient};
pub use document::parse_document;
pub use listing::parse_listing;
pub use nlic::NlicEndpoints;
