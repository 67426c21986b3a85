//! Media client errors.
//!
//! Every variant carries the endpoint that failed so that upload failures
//! can be traced to a concrete request without enabling debug logging.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors from the media client.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Configuration problem (missing or malformed settings).
    #[error("media client configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transport-level HTTP failure (connect, timeout, TLS).
    #[error("media host request failed for {endpoint}: {source}")]
    Http {
        /// The endpoint being called.
        endpoint: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The media host returned a non-success status.
    #[error("media host returned {status} for {endpoint}: {body}")]
    UnexpectedStatus {
        /// The endpoint being called.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
        /// The upstream response body, passed through for diagnosis.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode media host response from {endpoint}: {message}")]
    Decode {
        /// The endpoint being called.
        endpoint: String,
        /// Decoder error message.
        message: String,
    },
}
