use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::client::{ClientConfig, DEFAULT_MAX_RETRIES};
use crate::error::{KolexError, Result};

const CONFIG_DIR_NAME: &str = ".kolex";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub law: LawConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LawConfig {
    /// Open API key, sent as the `OC` parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    pub seed_dir: PathBuf,
    pub index_path: PathBuf,
    /// Minimum spacing between upstream requests
    pub min_interval_ms: u64,
    pub max_retries: u32,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            seed_dir: PathBuf::from("data/seed"),
            index_path: PathBuf::from("data/law-index.json"),
            min_interval_ms: 500,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/database.db"),
        }
    }
}

impl Config {
    /// Get the configuration directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| KolexError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Create the configuration directory and a default file if missing
    pub fn initialize() -> Result<()> {
        let config_dir = Self::config_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| KolexError::Config(format!("Failed to create config directory: {}", e)))?;
            restrict_permissions(&config_dir, 0o700)?;
        }

        let config_file = Self::config_file_path()?;
        if !config_file.exists() {
            Self::default().save_to(&config_file)?;
        }

        Ok(())
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::initialize()?;
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| KolexError::Config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&contents)
            .map_err(|e| KolexError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        Self::initialize()?;
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| KolexError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml).map_err(|e| KolexError::Config(format!("Failed to write config file: {}", e)))?;
        restrict_permissions(path, 0o600)
    }

    /// Fetch client settings derived from the ingest section
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: self.ingest.timeout,
            min_interval_ms: self.ingest.min_interval_ms,
            ..ClientConfig::default()
        }
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "law.key" => self.law.key = Some(value.to_string()),
            "ingest.seed_dir" => self.ingest.seed_dir = PathBuf::from(value),
            "ingest.index_path" => self.ingest.index_path = PathBuf::from(value),
            "ingest.min_interval_ms" => self.ingest.min_interval_ms = parse_number(key, value)?,
            "ingest.max_retries" => self.ingest.max_retries = parse_number(key, value)?,
            "ingest.timeout" => self.ingest.timeout = parse_number(key, value)?,
            "store.db_path" => self.store.db_path = PathBuf::from(value),
            _ => {
                return Err(KolexError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "law.key" => self.law.key.clone(),
            "ingest.seed_dir" => Some(self.ingest.seed_dir.display().to_string()),
            "ingest.index_path" => Some(self.ingest.index_path.display().to_string()),
            "ingest.min_interval_ms" => Some(self.ingest.min_interval_ms.to_string()),
            "ingest.max_retries" => Some(self.ingest.max_retries.to_string()),
            "ingest.timeout" => Some(self.ingest.timeout.to_string()),
            "store.db_path" => Some(self.store.db_path.display().to_string()),
            _ => None,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| KolexError::Config(format!("{} expects a non-negative integer, got '{}'", key, value)))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| KolexError::Config(format!("Failed to set permissions on {}: {}", path.display(), e)))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ingest.min_interval_ms, 500);
        assert_eq!(config.ingest.max_retries, 3);
        assert_eq!(config.ingest.timeout, 30);
        assert_eq!(config.store.db_path, PathBuf::from("data/database.db"));
        assert!(config.law.key.is_none());
    }

    #[test]
    fn test_set_and_get_by_key_path() {
        let mut config = Config::default();
        config.set("law.key", "my-oc").unwrap();
        config.set("ingest.min_interval_ms", "750").unwrap();
        config.set("store.db_path", "/tmp/kr.db").unwrap();

        assert_eq!(config.get("law.key").as_deref(), Some("my-oc"));
        assert_eq!(config.get("ingest.min_interval_ms").as_deref(), Some("750"));
        assert_eq!(config.get("store.db_path").as_deref(), Some("/tmp/kr.db"));
        assert_eq!(config.client_config().min_interval_ms, 750);
    }

    #[test]
    fn test_rejects_unknown_key_and_bad_number() {
        let mut config = Config::default();
        assert!(matches!(config.set("law.nlic.key", "x"), Err(KolexError::Config(_))));
        assert!(matches!(config.set("ingest.max_retries", "-1"), Err(KolexError::Config(_))));
        assert_eq!(config.get("nope"), None);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "law:\n  key: abc\ningest:\n  max_retries: 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.law.key.as_deref(), Some("abc"));
        assert_eq!(config.ingest.max_retries, 5);
        assert_eq!(config.ingest.min_interval_ms, 500);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut config = Config::default();
        config.set("ingest.seed_dir", "seeds").unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
