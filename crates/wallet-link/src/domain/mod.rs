pub mod dispatch;
pub mod link;
pub mod validate;

pub use dispatch::{decide, LinkAction};
pub use link::{LinkRequest, WalletLink};
pub use validate::normalize_address;
