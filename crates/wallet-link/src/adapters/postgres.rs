//! Postgres-backed [`WalletLinkStore`].
//!
//! `wallet_links(id UUID PK, user_id TEXT, account_id TEXT UNIQUE, chain_id
//! TEXT, address VARCHAR(42), is_primary BOOL, verified_at TIMESTAMPTZ,
//! created_at, updated_at)` with a unique index on `(chain_id, address)`.
//! `account_id` is unique across the whole table — an account holds at
//! most one link, and a rebind can move it to a different chain and
//! address in one statement. Every upsert runs inside one transaction
//! holding `pg_advisory_xact_lock` on `hashtext(account_id)` and on
//! `hashtext(chain_id || address)`, acquired in that fixed order so two
//! concurrent requests for the same account or address always serialize
//! rather than deadlock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared_types::ChainId;

use crate::domain::{decide, LinkAction, LinkRequest, WalletLink};
use crate::error::{WalletError, WalletResult};
use crate::ports::outbound::WalletLinkStore;

pub struct PostgresWalletStore {
    pool: PgPool,
}

impl PostgresWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_link(row: &sqlx::postgres::PgRow) -> WalletResult<WalletLink> {
    let chain_id_raw: String = row.try_get("chain_id")?;
    Ok(WalletLink {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        account_id: row.try_get("account_id")?,
        chain_id: ChainId::parse(chain_id_raw)
            .map_err(|e| WalletError::Corrupted(format!("stored chain id invalid: {e}")))?,
        address: row.try_get("address")?,
        is_primary: row.try_get("is_primary")?,
        verified_at: row.try_get("verified_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

async fn find_by_address(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    chain_id: &ChainId,
    address: &str,
) -> WalletResult<Option<WalletLink>> {
    let row = sqlx::query("SELECT * FROM wallet_links WHERE chain_id = $1 AND address = $2")
        .bind(chain_id.as_str())
        .bind(address)
        .fetch_optional(&mut **tx)
        .await?;
    row.as_ref().map(row_to_link).transpose()
}

async fn find_by_account(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    account_id: &str,
) -> WalletResult<Option<WalletLink>> {
    let row = sqlx::query("SELECT * FROM wallet_links WHERE account_id = $1")
        .bind(account_id)
        .fetch_optional(&mut **tx)
        .await?;
    row.as_ref().map(row_to_link).transpose()
}

async fn has_primary(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: &str,
    chain_id: &ChainId,
) -> WalletResult<bool> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM wallet_links WHERE user_id = $1 AND chain_id = $2 AND is_primary) AS present",
    )
    .bind(user_id)
    .bind(chain_id.as_str())
    .fetch_one(&mut **tx)
    .await?;
    Ok(row.try_get("present")?)
}

async fn demote_others(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: &str,
    chain_id: &ChainId,
    now: DateTime<Utc>,
) -> WalletResult<()> {
    sqlx::query(
        "UPDATE wallet_links SET is_primary = FALSE, updated_at = $3 WHERE user_id = $1 AND chain_id = $2 AND is_primary",
    )
    .bind(user_id)
    .bind(chain_id.as_str())
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl WalletLinkStore for PostgresWalletStore {
    async fn upsert_link(&self, request: &LinkRequest) -> WalletResult<(WalletLink, bool, bool)> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&request.account_id)
            .execute(&mut *tx)
            .await?;
        let address_lock_key = format!("{}{}", request.chain_id.as_str(), request.address);
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&address_lock_key)
            .execute(&mut *tx)
            .await?;

        let by_address = find_by_address(&mut tx, &request.chain_id, &request.address).await?;
        let by_account = find_by_account(&mut tx, &request.account_id).await?;
        let user_has_primary = has_primary(&mut tx, &request.user_id, &request.chain_id).await?;

        let action = decide(request, by_address.as_ref(), by_account.as_ref(), user_has_primary)?;

        let now = Utc::now();
        let (link, created, promoted) = match action {
            LinkAction::UpdateExisting { id, promote } => {
                if promote {
                    demote_others(&mut tx, &request.user_id, &request.chain_id, now).await?;
                }
                let row = sqlx::query(
                    "UPDATE wallet_links SET is_primary = $2, updated_at = $3 WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(promote)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                let previous = by_address.as_ref().expect("UpdateExisting implies a matched row").is_primary;
                (row_to_link(&row)?, false, promote && !previous)
            }
            LinkAction::Unauthorized => return Err(WalletError::UnauthorizedAccess),
            LinkAction::RebindAddress { id, promote } => {
                if promote {
                    demote_others(&mut tx, &request.user_id, &request.chain_id, now).await?;
                }
                let row = sqlx::query(
                    "UPDATE wallet_links SET chain_id = $2, address = $3, is_primary = $4, updated_at = $5 WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(request.chain_id.as_str())
                .bind(&request.address)
                .bind(promote)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                let previous = by_account.as_ref().expect("RebindAddress implies a matched row").is_primary;
                (row_to_link(&row)?, false, promote && !previous)
            }
            LinkAction::InsertNew { demote_others: should_demote, promote } => {
                if should_demote {
                    demote_others(&mut tx, &request.user_id, &request.chain_id, now).await?;
                }
                let id = Uuid::new_v4();
                let row = sqlx::query(
                    r#"
                    INSERT INTO wallet_links
                        (id, user_id, account_id, chain_id, address, is_primary, verified_at, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $7)
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&request.user_id)
                .bind(&request.account_id)
                .bind(request.chain_id.as_str())
                .bind(&request.address)
                .bind(promote)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                (row_to_link(&row)?, true, promote)
            }
        };

        tx.commit().await?;
        Ok((link, created, promoted))
    }
}
