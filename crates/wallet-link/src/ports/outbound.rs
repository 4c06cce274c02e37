use async_trait::async_trait;

use crate::domain::{LinkRequest, WalletLink};
use crate::error::WalletResult;

/// Owns the whole transactional upsert: acquire the two advisory locks
/// (`account_id`, then `(chain_id, address)`), look up the rows `decide`
/// needs, apply the resulting action, and commit. `Ok((link, created,
/// promoted))` reports whether the row was freshly inserted and whether
/// this call is what made it primary, so the caller can derive a
/// `WalletLinked` event only when something actually changed.
#[async_trait]
pub trait WalletLinkStore: Send + Sync {
    async fn upsert_link(&self, request: &LinkRequest) -> WalletResult<(WalletLink, bool, bool)>;
}
