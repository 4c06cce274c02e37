//! Pure ABI decoders from raw chain logs into typed domain events.

pub mod domain;
pub mod error;

pub use domain::{
    decode_collection_created, decode_erc1155_transfer_batch, decode_erc1155_transfer_single,
    decode_erc721_transfer, parse_log, RawLog, SignatureTable, COLLECTION_CREATED,
    ERC1155_TRANSFER_BATCH, ERC1155_TRANSFER_SINGLE, ERC721_TRANSFER,
};
pub use error::{ParseError, ParseResult};
