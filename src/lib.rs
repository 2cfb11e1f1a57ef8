pub mod api;
pub mod cli;
pub mod config;
pub mod drift;
pub mod error;
pub mod ingest;
pub mod output;
pub mod progress;
pub mod store;
