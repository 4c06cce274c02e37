//! # Shared Types
//!
//! Cross-crate domain vocabulary for the marketplace indexing core.
//!
//! Every component in the workspace (chain client, stores, parser, reorg
//! handler, orchestrator, publisher, projector, wallet link, media pipeline)
//! depends on this crate rather than on each other, so the types here are the
//! single source of truth for identifiers, the domain event sum type, and the
//! error classification that drives retry/propagation policy.

pub mod chain_id;
pub mod errors;
pub mod event;
pub mod ids;
pub mod wallet_address;

pub use chain_id::ChainId;
pub use errors::{Classified, CoreError, ErrorKind};
pub use event::{DomainEvent, RoutableEvent};
pub use ids::{parse_event_id, RawEventId};
pub use wallet_address::WalletAddress;
