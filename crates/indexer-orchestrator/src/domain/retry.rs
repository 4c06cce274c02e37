//! Bounded exponential backoff around the chain-client calls the
//! orchestrator makes every tick. Mirrors the doubling-capped-delay loop the
//! teacher's file lock adapter uses for its own retries, generalised to any
//! classified error instead of one fixed `io::Error` case.

use std::future::Future;
use std::time::Duration;

use shared_types::Classified;
use tracing::warn;

pub const MAX_ATTEMPTS: u32 = 3;
pub const BASE_DELAY: Duration = Duration::from_millis(200);
pub const MAX_DELAY: Duration = Duration::from_secs(5);

/// Calls `f` until it succeeds, it returns a non-retryable error, or
/// `MAX_ATTEMPTS` is exhausted. Delay doubles after each retryable failure,
/// capped at `MAX_DELAY`.
pub async fn with_retry<T, E, F, Fut>(operation: &'static str, mut f: F) -> Result<T, E>
where
    E: Classified + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = BASE_DELAY;
    let mut attempt: u32 = 1;

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                warn!(operation, attempt, error = %e, "retrying after transient error");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
