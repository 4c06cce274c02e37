use async_trait::async_trait;

use chain_client::BlockHeader;
use shared_types::ChainId;

use crate::domain::{Advance, ReorgOutcome};
use crate::error::ReorgResult;

/// Invoked by the orchestrator once per tick with the chain's current head.
#[async_trait]
pub trait ReorgApi: Send + Sync {
    /// Detects whether `head` continues the stored checkpoint or forks away
    /// from it. On a fork this already compensates (rolls the checkpoint and
    /// raw events back to the common ancestor) since that write is correct
    /// regardless of what the caller does next. On a straight advance it
    /// does **not** move the checkpoint: the caller has not fetched or
    /// persisted the batch's logs yet, so committing here would let a later
    /// failure skip them. Call [`ReorgApi::commit_advance`] once the batch
    /// this head belongs to is fully processed.
    async fn handle_new_head(
        &self,
        chain_id: &ChainId,
        head: &BlockHeader,
    ) -> ReorgResult<ReorgOutcome>;

    /// Persists an [`Advance`] previously returned by `handle_new_head`. Call
    /// only after every log in the batch ending at `advance.new_block` has
    /// been stored and publish has been attempted — this is what makes
    /// `checkpoint.last_block` advance only past fully processed blocks.
    async fn commit_advance(&self, chain_id: &ChainId, advance: &Advance) -> ReorgResult<()>;
}
