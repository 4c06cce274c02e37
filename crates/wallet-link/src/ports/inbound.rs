use async_trait::async_trait;

use crate::domain::{LinkRequest, WalletLink};
use crate::error::WalletResult;

#[async_trait]
pub trait WalletLinkApi: Send + Sync {
    /// Validates and normalizes `request.address`, dispatches the upsert,
    /// and publishes a `WalletLinked` event when the link is new or its
    /// primary status changed.
    async fn link_wallet(&self, request: LinkRequest) -> WalletResult<WalletLink>;
}
