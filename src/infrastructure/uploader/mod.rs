//! HTTP Asset Uploader
//!
//! Posts event images to an external media host as `multipart/form-data`
//! and returns the hosted URL from its JSON reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::application::services::{Asset, AssetUploader, UploadError};
use crate::config::UploadSettings;

/// Reply body of the media host. `secure_url` is preferred over `url`.
#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: Option<String>,
    url: Option<String>,
}

impl UploadReply {
    fn into_url(self) -> Option<String> {
        self.secure_url.or(self.url).filter(|u| !u.is_empty())
    }
}

#[derive(Clone)]
pub struct HttpAssetUploader {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAssetUploader {
    pub fn new(settings: &UploadSettings) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| UploadError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl AssetUploader for HttpAssetUploader {
    async fn upload(&self, asset: Asset) -> Result<String, UploadError> {
        let size = asset.bytes.len();
        let mut part = Part::bytes(asset.bytes)
            .file_name(asset.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(content_type) = asset.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| UploadError::Rejected(format!("Invalid content type: {}", e)))?;
        }
        let form = Form::new().part("file", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(bytes = size, "Uploading asset");
        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Transport(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!(%status, body = %text, "Media host rejected upload");
            return Err(UploadError::Rejected(format!("HTTP {}", status)));
        }

        let reply: UploadReply = response
            .json()
            .await
            .map_err(|e| UploadError::Rejected(format!("Malformed upload reply: {}", e)))?;

        reply
            .into_url()
            .ok_or_else(|| UploadError::Rejected("Upload reply carried no URL".to_string()))
    }
}
