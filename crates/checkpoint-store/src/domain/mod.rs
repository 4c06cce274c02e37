pub mod checkpoint;

pub use checkpoint::{Checkpoint, ReorgHistory, SAFE_BLOCK_LAG};
