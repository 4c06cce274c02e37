pub mod inbound;
pub mod outbound;

pub use inbound::WalletLinkApi;
pub use outbound::WalletLinkStore;
