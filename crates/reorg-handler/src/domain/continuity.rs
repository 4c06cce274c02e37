use chain_client::BlockHeader;

use crate::error::{ReorgError, ReorgResult};

/// Assert a batch of headers is sequential and internally consistent: block
/// numbers increase by exactly one and each header's `parent_hash` matches
/// the previous header's `hash`. An empty or single-element batch is always
/// continuous.
pub fn assert_contiguous(batch: &[BlockHeader]) -> ReorgResult<()> {
    for pair in batch.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.number != prev.number + 1 {
            return Err(ReorgError::DiscontinuousBatch {
                block_number: next.number,
                reason: format!(
                    "expected block {}, got {}",
                    prev.number + 1,
                    next.number
                ),
            });
        }
        if next.parent_hash != prev.hash {
            return Err(ReorgError::DiscontinuousBatch {
                block_number: next.number,
                reason: "parent_hash does not match preceding block's hash".to_string(),
            });
        }
    }
    Ok(())
}
