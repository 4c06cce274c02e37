//! Postgres-backed [`CheckpointStore`].
//!
//! `indexer_checkpoints(chain_id TEXT PK, last_block NUMERIC(78,0),
//! last_block_hash VARCHAR(66), safe_block NUMERIC(78,0), safe_block_hash
//! VARCHAR(66), reorg_count BIGINT, last_reorg_at TIMESTAMPTZ, updated_at
//! TIMESTAMPTZ)` and `reorg_history(id SERIAL PK, ...)` per the persisted
//! state layout.

use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::{Checkpoint, ReorgHistory};
use crate::error::{CheckpointStoreError, CheckpointStoreResult};
use crate::ports::outbound::CheckpointStore;
use shared_types::ChainId;

pub struct PostgresCheckpointStore {
    pool: PgPool,
}

impl PostgresCheckpointStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn block_to_decimal(n: u64) -> BigDecimal {
    BigDecimal::from(n)
}

fn decimal_to_block(d: &BigDecimal) -> CheckpointStoreResult<u64> {
    d.to_u64()
        .ok_or_else(|| CheckpointStoreError::Corrupted(format!("non-numeric block number {d}")))
}

#[async_trait]
impl CheckpointStore for PostgresCheckpointStore {
    async fn get(&self, chain_id: &ChainId) -> CheckpointStoreResult<Checkpoint> {
        let row = sqlx::query(
            r#"
            SELECT last_block, last_block_hash, safe_block, safe_block_hash,
                   reorg_count, last_reorg_at, updated_at
            FROM indexer_checkpoints
            WHERE chain_id = $1
            "#,
        )
        .bind(chain_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(Checkpoint::zero(chain_id.clone()));
        };

        let last_block: BigDecimal = row.try_get("last_block")?;
        let safe_block: Option<BigDecimal> = row.try_get("safe_block")?;
        let reorg_count: i64 = row.try_get("reorg_count")?;

        Ok(Checkpoint {
            chain_id: chain_id.clone(),
            last_block: decimal_to_block(&last_block)?,
            last_block_hash: row.try_get("last_block_hash")?,
            safe_block: safe_block.map(|b| decimal_to_block(&b)).transpose()?,
            safe_block_hash: row.try_get("safe_block_hash")?,
            reorg_count: reorg_count.max(0) as u64,
            last_reorg_at: row.try_get("last_reorg_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn upsert(&self, checkpoint: &Checkpoint) -> CheckpointStoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO indexer_checkpoints
                (chain_id, last_block, last_block_hash, safe_block, safe_block_hash,
                 reorg_count, last_reorg_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            ON CONFLICT (chain_id) DO UPDATE SET
                last_block = EXCLUDED.last_block,
                last_block_hash = EXCLUDED.last_block_hash,
                safe_block = EXCLUDED.safe_block,
                safe_block_hash = EXCLUDED.safe_block_hash,
                reorg_count = EXCLUDED.reorg_count,
                last_reorg_at = EXCLUDED.last_reorg_at,
                updated_at = now()
            "#,
        )
        .bind(checkpoint.chain_id.as_str())
        .bind(block_to_decimal(checkpoint.last_block))
        .bind(&checkpoint.last_block_hash)
        .bind(checkpoint.safe_block.map(block_to_decimal))
        .bind(&checkpoint.safe_block_hash)
        .bind(checkpoint.reorg_count as i64)
        .bind(checkpoint.last_reorg_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_reorg_count(
        &self,
        chain_id: &ChainId,
        new_hash: Option<String>,
    ) -> CheckpointStoreResult<Checkpoint> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query(
            r#"SELECT reorg_count FROM indexer_checkpoints WHERE chain_id = $1 FOR UPDATE"#,
        )
        .bind(chain_id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let next_count: i64 = current.map(|r| r.try_get::<i64, _>("reorg_count")).transpose()?.unwrap_or(0) + 1;
        let now: DateTime<Utc> = Utc::now();

        sqlx::query(
            r#"
            UPDATE indexer_checkpoints
            SET reorg_count = $2, last_reorg_at = $3, last_block_hash = COALESCE($4, last_block_hash), updated_at = now()
            WHERE chain_id = $1
            "#,
        )
        .bind(chain_id.as_str())
        .bind(next_count)
        .bind(now)
        .bind(&new_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get(chain_id).await
    }

    async fn set_to_block(
        &self,
        chain_id: &ChainId,
        number: u64,
        hash: Option<String>,
    ) -> CheckpointStoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO indexer_checkpoints (chain_id, last_block, last_block_hash, reorg_count, updated_at)
            VALUES ($1, $2, $3, 0, now())
            ON CONFLICT (chain_id) DO UPDATE SET
                last_block = EXCLUDED.last_block,
                last_block_hash = EXCLUDED.last_block_hash,
                updated_at = now()
            "#,
        )
        .bind(chain_id.as_str())
        .bind(block_to_decimal(number))
        .bind(&hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, chain_id: &ChainId) -> CheckpointStoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM indexer_checkpoints WHERE chain_id = $1"#)
            .bind(chain_id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CheckpointStoreError::NotFound);
        }
        Ok(())
    }

    async fn save_reorg(&self, history: &ReorgHistory) -> CheckpointStoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reorg_history
                (chain_id, detected_at, fork_block, old_chain_head, new_chain_head,
                 old_block_hash, new_block_hash, affected_blocks, rollback_to, data_affected)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(history.chain_id.as_str())
        .bind(history.detected_at)
        .bind(history.fork_block as i64)
        .bind(history.old_head as i64)
        .bind(history.new_head as i64)
        .bind(&history.old_hash)
        .bind(&history.new_hash)
        .bind(history.affected_blocks as i32)
        .bind(history.rollback_to as i64)
        .bind(&history.data_affected)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
