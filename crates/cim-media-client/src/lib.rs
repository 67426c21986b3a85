//! # cim-media-client — Typed client for the evidence media host
//!
//! Resolution evidence (photos of completed work) is not stored by the
//! stack itself; it is uploaded to an external object-storage/media
//! service that returns a durable URL. This crate is the only authorized
//! path for that interaction — route handlers never issue raw HTTP to the
//! media host.
//!
//! ## Contract
//!
//! `POST {base_url}/upload` with a multipart form:
//!
//! | part | value |
//! |------|-------|
//! | `file` | the raw bytes, original filename and content type preserved |
//! | `folder` | upload folder, default `complaint-evidence` |
//! | `resource_type` | always `auto` — the host sniffs the media kind |
//!
//! The host responds `200` with `{"secure_url": "...", "public_id": "..."}`.
//! Anything else is an [`MediaError::UnexpectedStatus`] carrying the
//! upstream body for diagnosis.

pub mod config;
pub mod error;

pub use config::{ConfigError, MediaConfig};
pub use error::MediaError;

use serde::Deserialize;
use std::time::Duration;

/// Receipt returned by the media host after a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    /// Durable HTTPS URL of the uploaded object.
    pub secure_url: String,
    /// Host-assigned object identifier.
    pub public_id: String,
}

/// Client for the evidence media host.
#[derive(Debug, Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    base_url: url::Url,
    folder: String,
}

impl MediaClient {
    /// Create a new media client from configuration.
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_key
                    ))
                    .map_err(|_| MediaError::Config(ConfigError::MissingApiKey))?,
                );
                headers
            })
            .build()
            .map_err(|e| MediaError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            folder: config.upload_folder,
        })
    }

    /// Upload a binary payload, returning the host's receipt.
    ///
    /// The upload is a single attempt — failures propagate to the caller
    /// as terminal errors for the request.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: String,
        content_type: String,
    ) -> Result<UploadReceipt, MediaError> {
        let endpoint = self
            .base_url
            .join("upload")
            .map_err(|_| MediaError::Config(ConfigError::InvalidUrl(self.base_url.to_string())))?;

        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(&content_type)
            .map_err(|e| MediaError::Decode {
                endpoint: endpoint.to_string(),
                message: format!("invalid content type: {e}"),
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", self.folder.clone())
            .text("resource_type", "auto");

        tracing::debug!(endpoint = %endpoint, size, "uploading evidence to media host");

        let response = self
            .http
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadReceipt>()
            .await
            .map_err(|e| MediaError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}
