//! Read-only EVM RPC adapter. One instance per configured chain.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{AlloyChainClient, InMemoryChainClient};
pub use domain::{BlockHeader, CircuitBreaker, Log, LogFilter};
pub use error::{ChainClientError, ChainClientResult};
pub use ports::ChainClient;
