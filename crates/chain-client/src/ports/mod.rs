pub mod outbound;

pub use outbound::ChainClient;
