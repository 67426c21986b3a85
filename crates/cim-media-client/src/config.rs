//! Media client configuration.
//!
//! Configures the base URL, credentials, and upload folder for the media
//! host. Override via environment variables or explicit construction for
//! staging/testing.

use url::Url;

/// Configuration for connecting to the media host.
///
/// Custom `Debug` implementation redacts the `api_key` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct MediaConfig {
    /// Base URL of the media host.
    pub base_url: Url,
    /// Bearer token for API authentication.
    pub api_key: String,
    /// Folder uploads are placed under. Default: `complaint-evidence`.
    pub upload_folder: String,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("upload_folder", &self.upload_folder)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MediaConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `MEDIA_BASE_URL` (required)
    /// - `MEDIA_API_KEY` (required)
    /// - `MEDIA_UPLOAD_FOLDER` (default: `complaint-evidence`)
    /// - `MEDIA_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("MEDIA_BASE_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        let base_url: Url = base_url
            .parse()
            .map_err(|_| ConfigError::InvalidUrl(base_url))?;
        let api_key = std::env::var("MEDIA_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

        Ok(Self {
            base_url,
            api_key,
            upload_folder: std::env::var("MEDIA_UPLOAD_FOLDER")
                .unwrap_or_else(|_| "complaint-evidence".to_string()),
            timeout_secs: std::env::var("MEDIA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url
                .parse()
                .map_err(|_| ConfigError::InvalidUrl(base_url.to_string()))?,
            api_key: "test-key".to_string(),
            upload_folder: "complaint-evidence".to_string(),
            timeout_secs: 5,
        })
    }
}

/// Errors building a [`MediaConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `MEDIA_BASE_URL` was not set.
    #[error("MEDIA_BASE_URL is required")]
    MissingBaseUrl,
    /// `MEDIA_API_KEY` was not set.
    #[error("MEDIA_API_KEY is required")]
    MissingApiKey,
    /// A URL could not be parsed.
    #[error("invalid media host URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = MediaConfig::local_mock("http://127.0.0.1:9000").unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn local_mock_has_defaults() {
        let config = MediaConfig::local_mock("http://127.0.0.1:9000").unwrap();
        assert_eq!(config.upload_folder, "complaint-evidence");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn invalid_url_rejected() {
        assert!(MediaConfig::local_mock("not a url").is_err());
    }
}
