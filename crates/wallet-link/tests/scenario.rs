//! Drives the service through its public port only, the way the
//! marketplace API handler would.

use std::sync::Arc;

use event_publisher::InMemoryEventPublisher;
use shared_types::ChainId;
use wallet_link::{InMemoryWalletStore, LinkRequest, WalletLinkApi, WalletLinkService};

fn request(user_id: &str, account_id: &str, address: &str, primary: bool) -> LinkRequest {
    LinkRequest {
        user_id: user_id.to_string(),
        account_id: account_id.to_string(),
        chain_id: ChainId::eip155(1),
        address: address.to_string(),
        requested_primary: primary,
    }
}

#[tokio::test]
async fn second_account_going_primary_demotes_the_first_and_a_stolen_address_is_refused() {
    let store = Arc::new(InMemoryWalletStore::new());
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let svc = WalletLinkService::new(store, publisher.clone());

    let first = svc
        .link_wallet(request("user-1", "acct-1", "0x0000000000000000000000000000000000aaaa", true))
        .await
        .unwrap();
    assert!(first.is_primary);

    let second = svc
        .link_wallet(request("user-1", "acct-2", "0x0000000000000000000000000000000000bbbb", true))
        .await
        .unwrap();
    assert!(second.is_primary);
    assert_ne!(second.id, first.id);

    // Another account cannot claim an address already bound elsewhere.
    let stolen = svc
        .link_wallet(request("user-2", "acct-3", "0x0000000000000000000000000000000000bbbb", false))
        .await;
    assert!(stolen.is_err());

    assert_eq!(publisher.len(), 2);
}

#[tokio::test]
async fn rebinding_the_same_account_to_a_new_chain_and_address_moves_the_row() {
    let store = Arc::new(InMemoryWalletStore::new());
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let svc = WalletLinkService::new(store, publisher.clone());

    let first = svc
        .link_wallet(request("user-1", "acct-1", "0x0000000000000000000000000000000000aaaa", false))
        .await
        .unwrap();

    let moved = svc
        .link_wallet(LinkRequest {
            chain_id: ChainId::eip155(137),
            ..request("user-1", "acct-1", "0x0000000000000000000000000000000000cccc", false)
        })
        .await
        .unwrap();

    assert_eq!(moved.id, first.id);
    assert_eq!(moved.chain_id, ChainId::eip155(137));
    assert_eq!(moved.address, "0x0000000000000000000000000000000000cccc");
    // Moving (no primary change) does not re-publish.
    assert_eq!(publisher.len(), 0);
}
