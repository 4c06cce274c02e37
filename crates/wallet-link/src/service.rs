use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use event_publisher::EventPublisher;
use shared_types::event::WalletLinked;
use shared_types::DomainEvent;

use crate::domain::{normalize_address, LinkRequest, WalletLink};
use crate::error::WalletResult;
use crate::ports::{WalletLinkApi, WalletLinkStore};

pub struct WalletLinkService<S: WalletLinkStore, P: EventPublisher> {
    store: Arc<S>,
    publisher: Arc<P>,
}

impl<S: WalletLinkStore, P: EventPublisher> WalletLinkService<S, P> {
    pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self {
        Self { store, publisher }
    }
}

#[async_trait]
impl<S: WalletLinkStore, P: EventPublisher> WalletLinkApi for WalletLinkService<S, P> {
    async fn link_wallet(&self, request: LinkRequest) -> WalletResult<WalletLink> {
        let address = normalize_address(&request.address)?;
        let request = LinkRequest { address, ..request };

        let (link, created, promoted) = self.store.upsert_link(&request).await?;

        if created || promoted {
            let event = DomainEvent::WalletLinked(WalletLinked {
                user_id: link.user_id.clone(),
                account_id: link.account_id.clone(),
                chain_id: link.chain_id.clone(),
                address: link.address.clone(),
                is_primary: link.is_primary,
            });
            if let Err(e) = self.publisher.publish(&event).await {
                warn!(error = %e, account_id = %link.account_id, "failed to publish wallet.linked event");
            }
        }

        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use event_publisher::InMemoryEventPublisher;
    use shared_types::ChainId;

    use super::*;
    use crate::adapters::InMemoryWalletStore;

    fn request(account_id: &str, address: &str, primary: bool) -> LinkRequest {
        LinkRequest {
            user_id: "user-1".to_string(),
            account_id: account_id.to_string(),
            chain_id: ChainId::eip155(1),
            address: address.to_string(),
            requested_primary: primary,
        }
    }

    #[tokio::test]
    async fn linking_a_new_wallet_publishes_once() {
        let store = Arc::new(InMemoryWalletStore::new());
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let svc = WalletLinkService::new(store, publisher.clone());

        let link = svc
            .link_wallet(request("acct-1", "0xAbCdEf0123456789aBcDef0123456789aBCDEF01", true))
            .await
            .unwrap();

        assert_eq!(link.address, "0xabcdef0123456789abcdef0123456789abcdef01");
        assert!(link.is_primary);
        assert_eq!(publisher.len(), 1);
    }

    #[tokio::test]
    async fn rebinding_the_same_account_to_a_new_address_moves_the_row_without_republishing() {
        let store = Arc::new(InMemoryWalletStore::new());
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let svc = WalletLinkService::new(store, publisher.clone());

        let first = svc
            .link_wallet(request("acct-1", "0x0000000000000000000000000000000000aaaa", false))
            .await
            .unwrap();
        let rebound = svc
            .link_wallet(request("acct-1", "0x0000000000000000000000000000000000bbbb", false))
            .await
            .unwrap();

        assert_eq!(rebound.id, first.id);
        assert_eq!(rebound.address, "0x0000000000000000000000000000000000bbbb");
        // Same account, no primary-status change: moving the address is not
        // itself an event-worthy change.
        assert_eq!(publisher.len(), 1);
    }

    #[tokio::test]
    async fn claiming_an_address_another_account_holds_is_unauthorized() {
        let store = Arc::new(InMemoryWalletStore::new());
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let svc = WalletLinkService::new(store, publisher.clone());

        svc.link_wallet(request("acct-1", "0x0000000000000000000000000000000000aaaa", false))
            .await
            .unwrap();
        let err = svc
            .link_wallet(request("acct-2", "0x0000000000000000000000000000000000aaaa", false))
            .await
            .unwrap_err();

        assert!(matches!(err, crate::error::WalletError::UnauthorizedAccess));
    }
}
