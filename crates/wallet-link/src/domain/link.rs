use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_types::ChainId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLink {
    pub id: Uuid,
    pub user_id: String,
    pub account_id: String,
    pub chain_id: ChainId,
    pub address: String,
    pub is_primary: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the caller wants linked. `address` is validated and lowercased
/// before dispatch ever sees it.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub user_id: String,
    pub account_id: String,
    pub chain_id: ChainId,
    pub address: String,
    pub requested_primary: bool,
}
