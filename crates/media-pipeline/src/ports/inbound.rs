use async_trait::async_trait;

use crate::domain::Asset;
use crate::error::MediaResult;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[async_trait]
pub trait MediaPipelineApi: Send + Sync {
    /// Validates, hashes, dedups, stores, and requests pinning for one
    /// upload. `Ok((asset, true))` means the bytes were already on file.
    async fn upload(&self, request: UploadRequest, bytes: Vec<u8>) -> MediaResult<(Asset, bool)>;
}
