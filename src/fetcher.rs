use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::{AppError, Result};

/// Some hosts (Google Drive among them) refuse requests without a browser identity.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Downloads source documents over HTTP.
#[derive(Clone)]
pub struct DocumentFetcher {
    client: Client,
    max_bytes: usize,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(DocumentFetcher { client, max_bytes })
    }

    /// GETs `url` and returns the body. Anything but a 200 is a failure.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::DownloadError(format!(
                "Download failed with status: {}",
                status.as_u16()
            )));
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes as u64 {
                return Err(self.too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!(bytes = body.len(), "Document downloaded");
        Ok(body)
    }

    fn too_large(&self) -> AppError {
        AppError::DownloadError(format!(
            "Download failed: document exceeds the {} byte limit",
            self.max_bytes
        ))
    }
}
