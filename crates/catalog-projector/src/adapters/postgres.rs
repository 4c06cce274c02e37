//! Postgres-backed [`CatalogStore`].
//!
//! `processed_events(event_id TEXT PK, processed_at TIMESTAMPTZ)` guards
//! idempotency; `collections(id UUID PK, chain_id TEXT, contract_address
//! VARCHAR(42), creator VARCHAR(42), name TEXT, symbol TEXT, slug TEXT,
//! royalty_recipient VARCHAR(42), royalty_bps INT, max_supply NUMERIC(78,0),
//! floor_price NUMERIC(78,0), volume NUMERIC(78,0), created_at, updated_at)`
//! with a unique index on `(chain_id, contract_address)`.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared_types::ChainId;

use crate::domain::{Collection, CollectionFields};
use crate::error::{CatalogError, CatalogResult};
use crate::ports::outbound::CatalogStore;

pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn u256_to_decimal(value: U256) -> CatalogResult<BigDecimal> {
    BigDecimal::from_str(&value.to_string())
        .map_err(|e| CatalogError::Corrupted(format!("u256 '{value}' is not decimal-representable: {e}")))
}

fn decimal_to_u256(value: &BigDecimal) -> CatalogResult<U256> {
    U256::from_str(&value.to_string())
        .map_err(|e| CatalogError::Corrupted(format!("decimal '{value}' does not fit u256: {e}")))
}

fn row_to_collection(row: &sqlx::postgres::PgRow) -> CatalogResult<Collection> {
    let chain_id_raw: String = row.try_get("chain_id")?;
    let max_supply: BigDecimal = row.try_get("max_supply")?;
    let floor_price: Option<BigDecimal> = row.try_get("floor_price")?;
    let volume: BigDecimal = row.try_get("volume")?;
    let royalty_recipient: Option<String> = row.try_get("royalty_recipient")?;
    let royalty_bps: i32 = row.try_get("royalty_bps")?;

    Ok(Collection {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        chain_id: ChainId::parse(chain_id_raw)
            .map_err(|e| CatalogError::Corrupted(format!("stored chain id invalid: {e}")))?,
        contract_address: row
            .try_get::<String, _>("contract_address")?
            .parse()
            .map_err(|_| CatalogError::Corrupted("stored contract_address is not a valid address".to_string()))?,
        creator: row
            .try_get::<String, _>("creator")?
            .parse()
            .map_err(|_| CatalogError::Corrupted("stored creator is not a valid address".to_string()))?,
        name: row.try_get("name")?,
        symbol: row.try_get("symbol")?,
        royalty_recipient: royalty_recipient
            .map(|s| s.parse::<Address>())
            .transpose()
            .map_err(|_| CatalogError::Corrupted("stored royalty_recipient is not a valid address".to_string()))?,
        royalty_bps: royalty_bps.max(0) as u32,
        max_supply: decimal_to_u256(&max_supply)?,
        floor_price: floor_price.as_ref().map(decimal_to_u256).transpose()?,
        volume: decimal_to_u256(&volume)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn upsert_collection(
        &self,
        event_id: &str,
        fields: &CollectionFields,
    ) -> CatalogResult<Option<(Collection, bool)>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO processed_events (event_id, processed_at)
            VALUES ($1, now())
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.commit().await?;
            return Ok(None);
        }

        let id = Uuid::new_v4();
        let now: DateTime<Utc> = Utc::now();
        let slug = fields.slug();
        let max_supply = u256_to_decimal(fields.max_supply)?;

        let row = sqlx::query(
            r#"
            INSERT INTO collections
                (id, chain_id, contract_address, creator, name, symbol, slug,
                 royalty_recipient, royalty_bps, max_supply, floor_price, volume,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, 0, $8, NULL, 0, $9, $9)
            ON CONFLICT (chain_id, contract_address) DO UPDATE SET
                creator = EXCLUDED.creator,
                name = EXCLUDED.name,
                symbol = EXCLUDED.symbol,
                slug = EXCLUDED.slug,
                max_supply = EXCLUDED.max_supply,
                updated_at = EXCLUDED.updated_at
            RETURNING *, (xmax = 0) AS is_new
            "#,
        )
        .bind(id)
        .bind(fields.chain_id.as_str())
        .bind(fields.contract_address.to_string())
        .bind(fields.creator.to_string())
        .bind(&fields.name)
        .bind(&fields.symbol)
        .bind(&slug)
        .bind(&max_supply)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let is_new: bool = row.try_get("is_new")?;
        let collection = row_to_collection(&row)?;

        tx.commit().await?;
        Ok(Some((collection, is_new)))
    }
}
