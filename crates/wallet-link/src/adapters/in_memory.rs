use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use shared_types::ChainId;

use crate::domain::{decide, LinkAction, LinkRequest, WalletLink};
use crate::error::WalletResult;
use crate::ports::WalletLinkStore;

/// Single mutex stands in for the two Postgres advisory locks: every
/// lookup-then-mutate for an upsert happens while holding it, so the two
/// locks collapse into one critical section.
#[derive(Default)]
pub struct InMemoryWalletStore {
    links: Mutex<HashMap<Uuid, WalletLink>>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> Vec<WalletLink> {
        self.links.lock().values().cloned().collect()
    }

    fn find_by_address(links: &HashMap<Uuid, WalletLink>, chain_id: &ChainId, address: &str) -> Option<WalletLink> {
        links
            .values()
            .find(|l| &l.chain_id == chain_id && l.address == address)
            .cloned()
    }

    /// `account_id` is unique across the whole table: an account has at
    /// most one link row, regardless of chain.
    fn find_by_account(links: &HashMap<Uuid, WalletLink>, account_id: &str) -> Option<WalletLink> {
        links.values().find(|l| l.account_id == account_id).cloned()
    }

    fn has_primary(links: &HashMap<Uuid, WalletLink>, user_id: &str, chain_id: &ChainId) -> bool {
        links
            .values()
            .any(|l| l.user_id == user_id && &l.chain_id == chain_id && l.is_primary)
    }
}

#[async_trait]
impl WalletLinkStore for InMemoryWalletStore {
    async fn upsert_link(&self, request: &LinkRequest) -> WalletResult<(WalletLink, bool, bool)> {
        let mut links = self.links.lock();

        let by_address = Self::find_by_address(&links, &request.chain_id, &request.address);
        let by_account = Self::find_by_account(&links, &request.account_id);
        let has_primary = Self::has_primary(&links, &request.user_id, &request.chain_id);

        let action = decide(request, by_address.as_ref(), by_account.as_ref(), has_primary)?;

        let now = Utc::now();
        let (link, created, promoted) = match action {
            LinkAction::UpdateExisting { id, promote } => {
                if promote {
                    demote_others(&mut links, &request.user_id, &request.chain_id);
                }
                let row = links.get_mut(&id).expect("row found by decide() exists");
                let promoted = promote && !row.is_primary;
                row.is_primary = promote;
                row.updated_at = now;
                (row.clone(), false, promoted)
            }
            LinkAction::Unauthorized => return Err(crate::error::WalletError::UnauthorizedAccess),
            LinkAction::RebindAddress { id, promote } => {
                if promote {
                    demote_others(&mut links, &request.user_id, &request.chain_id);
                }
                let row = links.get_mut(&id).expect("row found by decide() exists");
                row.chain_id = request.chain_id.clone();
                row.address = request.address.clone();
                let promoted = promote && !row.is_primary;
                row.is_primary = promote;
                row.updated_at = now;
                (row.clone(), false, promoted)
            }
            LinkAction::InsertNew { demote_others: should_demote, promote } => {
                if should_demote {
                    demote_others(&mut links, &request.user_id, &request.chain_id);
                }
                let row = WalletLink {
                    id: Uuid::new_v4(),
                    user_id: request.user_id.clone(),
                    account_id: request.account_id.clone(),
                    chain_id: request.chain_id.clone(),
                    address: request.address.clone(),
                    is_primary: promote,
                    verified_at: None,
                    created_at: now,
                    updated_at: now,
                };
                links.insert(row.id, row.clone());
                (row, true, promote)
            }
        };

        Ok((link, created, promoted))
    }
}

fn demote_others(links: &mut HashMap<Uuid, WalletLink>, user_id: &str, chain_id: &ChainId) {
    for link in links.values_mut() {
        if link.user_id == user_id && &link.chain_id == chain_id {
            link.is_primary = false;
        }
    }
}
