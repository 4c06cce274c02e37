use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::{Asset, NewAssetFields};
use crate::error::{MediaError, MediaResult};
use crate::ports::outbound::{AssetStore, ObjectStore, PinOutcome, Pinner};

#[derive(Default)]
pub struct InMemoryAssetStore {
    by_id: Mutex<HashMap<Uuid, Asset>>,
    by_sha256: Mutex<HashMap<String, Uuid>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> Vec<Asset> {
        self.by_id.lock().values().cloned().collect()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn find_or_create_pending(&self, fields: &NewAssetFields) -> MediaResult<(Asset, bool)> {
        let mut by_sha256 = self.by_sha256.lock();
        let mut by_id = self.by_id.lock();

        if let Some(existing_id) = by_sha256.get(&fields.sha256) {
            let existing = by_id.get(existing_id).expect("index and table stay in sync").clone();
            return Ok((existing, false));
        }

        let asset = Asset::new(fields);
        by_sha256.insert(fields.sha256.clone(), asset.id);
        by_id.insert(asset.id, asset.clone());
        Ok((asset, true))
    }

    async fn mark_pinned(&self, id: Uuid, cid: String, gateway_url: String) -> MediaResult<Asset> {
        let mut by_id = self.by_id.lock();
        let asset = by_id.get_mut(&id).ok_or_else(|| MediaError::NotFound(id.to_string()))?;
        asset.pin_status = "pinned".to_string();
        asset.cid = Some(cid);
        asset.gateway_url = Some(gateway_url);
        asset.updated_at = Utc::now();
        Ok(asset.clone())
    }

    async fn mark_failed(&self, id: Uuid, error: String) -> MediaResult<Asset> {
        let mut by_id = self.by_id.lock();
        let asset = by_id.get_mut(&id).ok_or_else(|| MediaError::NotFound(id.to_string()))?;
        asset.pin_status = "failed".to_string();
        asset.pin_error = Some(error);
        asset.pin_attempts += 1;
        asset.updated_at = Utc::now();
        Ok(asset.clone())
    }
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> MediaResult<()> {
        self.objects.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Always succeeds with a deterministic fake CID, for tests and local
/// development without a real pinning backend configured.
#[derive(Default)]
pub struct InMemoryPinner;

impl InMemoryPinner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Pinner for InMemoryPinner {
    async fn request_pin(&self, asset_id: Uuid, bytes: &[u8]) -> MediaResult<PinOutcome> {
        let cid = format!("bafy{}", &crate::domain::sha256_hex(bytes)[..8]);
        Ok(PinOutcome { cid: cid.clone(), gateway_url: format!("https://gateway.example/ipfs/{cid}?asset={asset_id}") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetCategory;

    fn fields(sha256: &str) -> NewAssetFields {
        NewAssetFields {
            id: Uuid::new_v4(),
            sha256: sha256.to_string(),
            filename: "a.png".to_string(),
            content_type: "image/png".to_string(),
            category: AssetCategory::Image,
            size_bytes: 10,
            width: None,
            height: None,
            storage_key: format!("media/{}/a.png", Uuid::new_v4()),
        }
    }

    #[tokio::test]
    async fn second_call_with_same_hash_returns_existing_row() {
        let store = InMemoryAssetStore::new();
        let (first, created_first) = store.find_or_create_pending(&fields("abc")).await.unwrap();
        let (second, created_second) = store.find_or_create_pending(&fields("abc")).await.unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn mark_failed_increments_attempts() {
        let store = InMemoryAssetStore::new();
        let (asset, _) = store.find_or_create_pending(&fields("abc")).await.unwrap();

        store.mark_failed(asset.id, "timeout".to_string()).await.unwrap();
        let again = store.mark_failed(asset.id, "timeout".to_string()).await.unwrap();

        assert_eq!(again.pin_attempts, 2);
        assert_eq!(again.pin_status, "failed");
    }
}
