//! Process entry point: configuration, dependency wiring, and the
//! supervised task set (one orchestrator per chain, the catalog projector
//! consumer, and the health heartbeat). Everything else in the workspace is
//! a library; this crate is the only place that owns a `main`.

pub mod catalog_consumer;
pub mod config;
pub mod container;
pub mod error;
pub mod health;

pub use catalog_consumer::CatalogConsumer;
pub use config::Config;
pub use container::SharedInfra;
pub use error::{NodeError, NodeResult};
