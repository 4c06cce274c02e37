pub mod alloy_client;
pub mod in_memory;

pub use alloy_client::AlloyChainClient;
pub use in_memory::InMemoryChainClient;
