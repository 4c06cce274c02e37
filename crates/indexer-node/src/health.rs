//! Publishes `indexer.health.{chain_id}` on a timer, independent of and
//! never blocking on the polling loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use event_publisher::EventPublisher;
use shared_types::ChainId;

pub async fn run_heartbeat<P: EventPublisher>(
    publisher: Arc<P>,
    chain_ids: Vec<ChainId>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    info!("heartbeat loop starting");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for chain_id in &chain_ids {
                    if let Err(e) = publisher.publish_heartbeat(chain_id).await {
                        warn!(chain_id = %chain_id, error = %e, "heartbeat publish failed");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("heartbeat loop stopping");
                    return;
                }
            }
        }
    }
}
