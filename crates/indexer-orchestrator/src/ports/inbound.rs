use async_trait::async_trait;

use crate::error::OrchestratorResult;

/// What the supervising process needs from a running chain loop.
#[async_trait]
pub trait OrchestratorLoop: Send + Sync {
    /// Drive the loop until `shutdown` fires or a fatal error occurs.
    async fn run(&self, shutdown: tokio::sync::watch::Receiver<bool>) -> OrchestratorResult<()>;

    /// Process exactly one tick; exposed for tests so assertions don't
    /// depend on the ticker's timing.
    async fn tick(&self) -> OrchestratorResult<()>;
}
