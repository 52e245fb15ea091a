//! Error handling module for vidscrub

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for vidscrub operations
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Policy, probe or encoder failure for one file
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Settings file could not be read
    #[error("Failed to read config file {path}: {message}")]
    ConfigRead { path: String, message: String },

    /// Settings file is not valid TOML for the settings schema
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Settings parsed but are inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// HTTP client setup failure
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for vidscrub operations
pub type ScrubResult<T> = std::result::Result<T, ScrubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_message() {
        let err = ScrubError::from(DomainError::ConflictingCodecs);
        assert_eq!(err.to_string(), "Cannot convert to both H265 and VP9");
    }

    #[test]
    fn invalid_config_names_the_problem() {
        let err = ScrubError::InvalidConfig {
            message: "radarr_api_key is required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: radarr_api_key is required"
        );
    }
}
