//! Reorg detection and compensation, triggered once per orchestrator tick.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{Advance, ReorgOutcome, Reorged, MAX_REORG_DEPTH};
pub use error::{ReorgError, ReorgResult};
pub use ports::ReorgApi;
pub use service::{validate_batch_continuity, ReorgHandlerService};
