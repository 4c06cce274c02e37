use uuid::Uuid;

use crate::domain::link::{LinkRequest, WalletLink};
use crate::error::WalletError;

/// What the store adapter must do to satisfy a [`LinkRequest`], decided
/// without touching the database. The adapter looks up `by_address` (any
/// link already bound to `(chain_id, address)`) and `by_account` (this
/// account's one link, on any chain, since `account_id` is unique across
/// the table) under its advisory locks, then calls [`decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// The account already owns this exact `(chain_id, address)`. Nothing
    /// moves; only `is_primary` may change.
    UpdateExisting { id: Uuid, promote: bool },
    /// The address is claimed by a link this account does not own.
    Unauthorized,
    /// The account has a link elsewhere; move it to the requested chain
    /// and address instead of inserting a second row.
    RebindAddress { id: Uuid, promote: bool },
    /// Neither the address nor the account has a row yet.
    InsertNew { demote_others: bool, promote: bool },
}

/// Pure decision for what an upsert should do, given the two lookups the
/// store performed under lock and whether the account already has a
/// primary address on `request.chain_id`.
///
/// `by_address` is the link (if any) currently bound to
/// `(request.chain_id, request.address)`. `by_account` is the link (if
/// any) this account holds — `account_id` is unique across the whole
/// table, one row per account regardless of chain — so a rebind can move
/// both the chain and the address, not just the address.
pub fn decide(
    request: &LinkRequest,
    by_address: Option<&WalletLink>,
    by_account: Option<&WalletLink>,
    user_has_primary_for_chain: bool,
) -> Result<LinkAction, WalletError> {
    let promote = request.requested_primary;
    let demote_others = promote && user_has_primary_for_chain;
    // Only the "neither exists" case auto-promotes: a brand new row is the
    // user's first wallet on this chain, so it becomes primary even if the
    // request did not ask for it. Updates and rebinds only promote when the
    // caller explicitly asks.
    let insert_promote = promote || !user_has_primary_for_chain;

    let action = match (by_address, by_account) {
        (Some(addr_row), Some(acct_row)) => {
            if addr_row.id == acct_row.id {
                LinkAction::UpdateExisting { id: addr_row.id, promote }
            } else {
                LinkAction::Unauthorized
            }
        }
        (Some(_), None) => LinkAction::Unauthorized,
        (None, Some(acct_row)) => LinkAction::RebindAddress { id: acct_row.id, promote },
        (None, None) => LinkAction::InsertNew { demote_others, promote: insert_promote },
    };

    Ok(action)
}
