//! HTTP client for the chord detection backend

use reqwest::multipart::{Form, Part};
use track2tabs::ChordTimeline;

use crate::config::{ConfigError, RelayConfig};
use crate::error::RelayError;
use crate::upload::DecodedUpload;

/// Sends audio to the backend and validates the timeline it returns.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    url: String,
}

impl BackendClient {
    pub fn new(config: &RelayConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(BackendClient {
            client,
            url: config.backend_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One attempt, no retries. Every failure comes back as [`RelayError::Upstream`].
    pub async fn detect_chords(&self, upload: DecodedUpload) -> Result<ChordTimeline, RelayError> {
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename.clone())
            .mime_str(&upload.mimetype)
            .map_err(|e| RelayError::InvalidRequest(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part);

        log::info!(
            "Forwarding '{}' ({} bytes, {}) to {}",
            upload.filename,
            size,
            upload.mimetype,
            self.url
        );

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RelayError::upstream("Chord detection backend unreachable", e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RelayError::upstream("Failed to read chord detection response", e.to_string())
        })?;

        if !status.is_success() {
            return Err(RelayError::Upstream {
                message: format!("Chord detection failed with status {}", status.as_u16()),
                details: Some(body),
            });
        }

        let timeline = ChordTimeline::from_json(&body).map_err(|e| {
            RelayError::upstream("Chord detection returned a malformed payload", e.to_string())
        })?;

        log::info!("Backend returned {} chords for '{}'", timeline.len(), upload.filename);
        Ok(timeline)
    }
}
