use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{categorize, sanitize_filename, sha256_hex, validate_dimensions, validate_size, Asset, NewAssetFields};
use crate::error::{MediaError, MediaResult};
use crate::ports::outbound::{AssetStore, ObjectStore, Pinner};
use crate::ports::{MediaPipelineApi, UploadRequest};

pub struct MediaPipelineService<A: AssetStore, O: ObjectStore, P: Pinner> {
    asset_store: Arc<A>,
    object_store: Arc<O>,
    pinner: Arc<P>,
}

impl<A: AssetStore, O: ObjectStore, P: Pinner> MediaPipelineService<A, O, P> {
    pub fn new(asset_store: Arc<A>, object_store: Arc<O>, pinner: Arc<P>) -> Self {
        Self { asset_store, object_store, pinner }
    }
}

#[async_trait]
impl<A: AssetStore, O: ObjectStore, P: Pinner> MediaPipelineApi for MediaPipelineService<A, O, P> {
    #[tracing::instrument(skip(self, bytes), fields(filename = %request.filename, size_bytes = bytes.len()))]
    async fn upload(&self, request: UploadRequest, bytes: Vec<u8>) -> MediaResult<(Asset, bool)> {
        let category = categorize(&request.content_type)
            .ok_or_else(|| MediaError::UnsupportedContentType(request.content_type.clone()))?;
        validate_size(bytes.len() as u64, category)?;
        validate_dimensions(request.width, request.height)?;

        let sha256 = sha256_hex(&bytes);
        let filename = sanitize_filename(&request.filename);
        let id = uuid::Uuid::new_v4();
        let storage_key = format!("media/{id}/{filename}");

        let fields = NewAssetFields {
            id,
            sha256,
            filename,
            content_type: request.content_type,
            category,
            size_bytes: bytes.len() as u64,
            width: request.width,
            height: request.height,
            storage_key,
        };

        let (asset, created) = self.asset_store.find_or_create_pending(&fields).await?;
        if !created {
            info!(asset_id = %asset.id, "duplicate upload, dedup hit");
            return Ok((asset, true));
        }

        self.object_store.put(&asset.storage_key, &bytes).await?;

        let asset = match self.pinner.request_pin(asset.id, &bytes).await {
            Ok(outcome) => self.asset_store.mark_pinned(asset.id, outcome.cid, outcome.gateway_url).await?,
            Err(e) => {
                warn!(asset_id = %asset.id, error = %e, "pinning failed");
                self.asset_store.mark_failed(asset.id, e.to_string()).await?
            }
        };

        Ok((asset, false))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::{InMemoryAssetStore, InMemoryObjectStore, InMemoryPinner};

    fn svc() -> MediaPipelineService<InMemoryAssetStore, InMemoryObjectStore, InMemoryPinner> {
        MediaPipelineService::new(
            Arc::new(InMemoryAssetStore::new()),
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryPinner::new()),
        )
    }

    fn request(filename: &str) -> UploadRequest {
        UploadRequest { filename: filename.to_string(), content_type: "image/png".to_string(), width: Some(64), height: Some(64) }
    }

    #[tokio::test]
    async fn first_upload_stores_and_pins() {
        let svc = svc();
        let (asset, dedup) = svc.upload(request("art.png"), b"hello world".to_vec()).await.unwrap();
        assert!(!dedup);
        assert_eq!(asset.pin_status, "pinned");
        assert!(asset.cid.is_some());
    }

    #[tokio::test]
    async fn repeat_upload_of_same_bytes_dedups() {
        let svc = svc();
        let (first, _) = svc.upload(request("art.png"), b"hello world".to_vec()).await.unwrap();
        let (second, dedup) = svc.upload(request("copy.png"), b"hello world".to_vec()).await.unwrap();
        assert!(dedup);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn unsupported_mime_is_rejected_before_hashing() {
        let svc = svc();
        let mut req = request("malware.exe");
        req.content_type = "application/x-msdownload".to_string();
        let err = svc.upload(req, b"bytes".to_vec()).await.unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedContentType(_)));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let svc = svc();
        let req = request("huge.png");
        let bytes = vec![0u8; 101 * 1024 * 1024];
        let err = svc.upload(req, bytes).await.unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { .. }));
    }
}
