pub mod decode;
pub mod signatures;

pub use decode::{
    decode_collection_created, decode_erc1155_transfer_batch, decode_erc1155_transfer_single,
    decode_erc721_transfer, parse_log, RawLog,
};
pub use signatures::{
    SignatureTable, COLLECTION_CREATED, ERC1155_TRANSFER_BATCH, ERC1155_TRANSFER_SINGLE,
    ERC721_TRANSFER,
};
