use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KolexError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid seed file {path}: {message}")]
    InvalidSeed { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store not found at {0}")]
    StoreMissing(PathBuf),

    #[error("{0}")]
    Other(String),
}

impl KolexError {
    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Network(_) => Some("Check your internet connection and try again.".to_string()),
            Self::RetriesExhausted { status, .. } if *status == 429 => Some(
                "The upstream is rate limiting this client. Wait a while before re-running; \
                 already written seed files will be skipped."
                    .to_string(),
            ),
            Self::RetriesExhausted { .. } => {
                Some("The upstream kept failing. Re-run later to resume from existing seeds.".to_string())
            }
            Self::StoreMissing(_) => Some("Build the store first with: kolex build".to_string()),
            Self::InvalidSeed { .. } => Some(
                "Delete or re-fetch the broken seed file, then run kolex build again."
                    .to_string(),
            ),
            Self::Config(_) => Some("Inspect the configuration with: kolex config path".to_string()),
            _ => None,
        }
    }

    /// Whether the failure came from the upstream rather than local state
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RetriesExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, KolexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_exhaustion_has_specific_hint() {
        let err = KolexError::RetriesExhausted {
            url: "https://www.law.go.kr/DRF/lawService.do".to_string(),
            status: 429,
            attempts: 4,
        };
        assert!(err.is_upstream());
        assert!(err.hint().unwrap().contains("rate limiting"));
        assert!(err.to_string().contains("after 4 attempts"));
    }

    #[test]
    fn test_store_missing_points_at_build() {
        let err = KolexError::StoreMissing(PathBuf::from("data/database.db"));
        assert!(!err.is_upstream());
        assert_eq!(err.hint().as_deref(), Some("Build the store first with: kolex build"));
    }

    #[test]
    fn test_conversions() {
        let io: KolexError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, KolexError::Io(_)));
        assert!(io.hint().is_none());

        let json: KolexError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(json, KolexError::Serialization(_)));
    }
}
