use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Ingest command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// Open API key (OC); falls back to law.key in the config file
    #[arg(long, env = "LAW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Reuse the cached discovery index instead of querying upstream
    #[arg(long)]
    pub skip_discovery: bool,

    /// Process only the first N index entries
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Re-fetch documents whose seed is a provision-less stub
    #[arg(long)]
    pub retry_stubs: bool,

    /// Directory for per-document seed files
    #[arg(long)]
    pub seed_dir: Option<PathBuf>,

    /// Path of the cached discovery index
    #[arg(long)]
    pub index_path: Option<PathBuf>,
}

/// Build command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Directory of seed files to load
    #[arg(long)]
    pub seed_dir: Option<PathBuf>,

    /// Database file to (re)create
    #[arg(long)]
    pub db: Option<PathBuf>,
}

/// Check-updates command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Open API key (OC); falls back to law.key in the config file
    #[arg(long, env = "LAW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Database file to compare against
    #[arg(long)]
    pub db: Option<PathBuf>,
}

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. law.key, ingest.max_retries)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize configuration
    Init,
}
