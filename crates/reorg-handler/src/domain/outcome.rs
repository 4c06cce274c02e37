use checkpoint_store::ReorgHistory;
use shared_types::event::ReorgNotification;

/// Maximum depth a reorg may roll back before it is treated as fatal.
pub const MAX_REORG_DEPTH: u64 = 128;

/// The head advanced in a straight line from the stored checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub new_block: u64,
    pub new_hash: String,
    pub new_safe_block: Option<u64>,
    pub new_safe_hash: Option<String>,
}

/// A fork was detected and compensated back to the common ancestor.
#[derive(Debug, Clone)]
pub struct Reorged {
    pub history: ReorgHistory,
    pub notification: ReorgNotification,
}

#[derive(Debug, Clone)]
pub enum ReorgOutcome {
    Advanced(Advance),
    Reorged(Box<Reorged>),
}
