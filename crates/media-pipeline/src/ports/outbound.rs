use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Asset, NewAssetFields};
use crate::error::MediaResult;

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// `FindOrCreateBySHA256`: on hit returns the existing row and `false`;
    /// on miss inserts a fresh `PENDING` row and returns `true`. Dedup is
    /// keyed on the unique `sha256` index, not a prior read, so concurrent
    /// uploads of the same bytes never race into two rows.
    async fn find_or_create_pending(&self, fields: &NewAssetFields) -> MediaResult<(Asset, bool)>;

    async fn mark_pinned(&self, id: Uuid, cid: String, gateway_url: String) -> MediaResult<Asset>;

    /// Sets `pin_status=FAILED`, records `error`, and increments
    /// `pin_attempts` so a retry sweep can bound its attempts.
    async fn mark_failed(&self, id: Uuid, error: String) -> MediaResult<Asset>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> MediaResult<()>;
}

pub struct PinOutcome {
    pub cid: String,
    pub gateway_url: String,
}

#[async_trait]
pub trait Pinner: Send + Sync {
    async fn request_pin(&self, asset_id: Uuid, bytes: &[u8]) -> MediaResult<PinOutcome>;
}
