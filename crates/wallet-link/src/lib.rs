//! Links a marketplace account to an on-chain address. Validates and
//! normalizes the address, dispatches to update/rebind/insert under an
//! advisory-locked transaction, and publishes `wallet.linked` when a link
//! is created or promoted to primary.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryWalletStore, PostgresWalletStore};
pub use domain::{decide, LinkAction, LinkRequest, WalletLink};
pub use error::{WalletError, WalletResult};
pub use ports::{WalletLinkApi, WalletLinkStore};
pub use service::WalletLinkService;
