//! Asset Uploader
//!
//! Port to the external binary storage service that hosts event images.

use async_trait::async_trait;

/// Binary content submitted with an event form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Upload failures
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload service rejected the asset: {0}")]
    Rejected(String),

    #[error("Upload transport error: {0}")]
    Transport(String),

    #[error("Upload timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

/// Accepts binary content and returns a durable URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(&self, asset: Asset) -> Result<String, UploadError>;
}
