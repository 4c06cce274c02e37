//! Pure ABI decoders. None of these touch the network or a store; each takes
//! topics/data and returns a typed event or a [`ParseError`].

use alloy_primitives::{Address, B256, U256};
use shared_types::event::{
    CollectionCreated, Erc1155TransferBatch, Erc1155TransferSingle, Erc721Transfer,
};
use shared_types::{ChainId, DomainEvent};

use crate::domain::signatures::{
    SignatureTable, COLLECTION_CREATED, ERC1155_TRANSFER_BATCH, ERC1155_TRANSFER_SINGLE,
    ERC721_TRANSFER,
};
use crate::error::{ParseError, ParseResult};

const WORD: usize = 32;

/// A single unparsed log, as handed down from the chain client.
pub struct RawLog<'a> {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub tx_hash: B256,
    pub log_index: u64,
    pub topics: &'a [B256],
    pub data: &'a [u8],
}

fn address_from_topic(topic: &B256) -> Address {
    Address::from_slice(&topic.as_slice()[12..32])
}

fn u256_at(data: &[u8], start: usize) -> ParseResult<U256> {
    let end = start + WORD;
    if end > data.len() {
        return Err(ParseError::DataTooShort {
            expected: end,
            actual: data.len(),
        });
    }
    Ok(U256::from_be_slice(&data[start..end]))
}

fn usize_at(data: &[u8], start: usize) -> ParseResult<usize> {
    let value = u256_at(data, start)?;
    value
        .try_into()
        .map_err(|_| ParseError::Malformed(format!("word at {start} does not fit in usize")))
}

fn is_zero_address(address: &Address) -> bool {
    address.is_zero()
}

/// Dispatch on `topics[0]` via the global signature table.
pub fn parse_log(log: &RawLog<'_>) -> ParseResult<DomainEvent> {
    let signature = log
        .topics
        .first()
        .copied()
        .ok_or(ParseError::WrongTopicCount {
            expected: 1,
            actual: 0,
        })?;

    let table = SignatureTable::global();
    match table.event_name(&signature) {
        Some(name) if name == ERC721_TRANSFER => {
            decode_erc721_transfer(log).map(DomainEvent::Erc721Transfer)
        }
        Some(name) if name == ERC1155_TRANSFER_SINGLE => {
            decode_erc1155_transfer_single(log).map(DomainEvent::Erc1155TransferSingle)
        }
        Some(name) if name == ERC1155_TRANSFER_BATCH => {
            decode_erc1155_transfer_batch(log).map(DomainEvent::Erc1155TransferBatch)
        }
        Some(name) if name == COLLECTION_CREATED => {
            decode_collection_created(log).map(DomainEvent::CollectionCreated)
        }
        _ => Err(ParseError::UnknownSignature(signature.to_string())),
    }
}

/// `[sig, from, to, tokenId]`, all indexed.
pub fn decode_erc721_transfer(log: &RawLog<'_>) -> ParseResult<Erc721Transfer> {
    if log.topics.len() != 4 {
        return Err(ParseError::WrongTopicCount {
            expected: 4,
            actual: log.topics.len(),
        });
    }

    let from = address_from_topic(&log.topics[1]);
    let to = address_from_topic(&log.topics[2]);
    let token_id = U256::from_be_slice(log.topics[3].as_slice());

    Ok(Erc721Transfer {
        chain_id: log.chain_id.clone(),
        contract_address: log.contract_address,
        tx_hash: log.tx_hash,
        log_index: log.log_index,
        from,
        to,
        token_id,
        is_mint: is_zero_address(&from),
    })
}

/// `[sig, operator, from, to]`; data = `id (32B) | value (32B)`.
pub fn decode_erc1155_transfer_single(log: &RawLog<'_>) -> ParseResult<Erc1155TransferSingle> {
    if log.topics.len() != 4 {
        return Err(ParseError::WrongTopicCount {
            expected: 4,
            actual: log.topics.len(),
        });
    }
    if log.data.len() < 2 * WORD {
        return Err(ParseError::DataTooShort {
            expected: 2 * WORD,
            actual: log.data.len(),
        });
    }

    let operator = address_from_topic(&log.topics[1]);
    let from = address_from_topic(&log.topics[2]);
    let to = address_from_topic(&log.topics[3]);
    let id = u256_at(log.data, 0)?;
    let value = u256_at(log.data, WORD)?;

    Ok(Erc1155TransferSingle {
        chain_id: log.chain_id.clone(),
        contract_address: log.contract_address,
        tx_hash: log.tx_hash,
        log_index: log.log_index,
        operator,
        from,
        to,
        id,
        value,
        is_mint: is_zero_address(&from),
    })
}

/// `[sig, operator, from, to]`; data = two head offsets, each pointing at a
/// `length | elements...` dynamic `uint256[]` tail.
pub fn decode_erc1155_transfer_batch(log: &RawLog<'_>) -> ParseResult<Erc1155TransferBatch> {
    if log.topics.len() != 4 {
        return Err(ParseError::WrongTopicCount {
            expected: 4,
            actual: log.topics.len(),
        });
    }
    if log.data.len() < 2 * WORD {
        return Err(ParseError::DataTooShort {
            expected: 2 * WORD,
            actual: log.data.len(),
        });
    }

    let operator = address_from_topic(&log.topics[1]);
    let from = address_from_topic(&log.topics[2]);
    let to = address_from_topic(&log.topics[3]);

    let ids_offset = usize_at(log.data, 0)?;
    let values_offset = usize_at(log.data, WORD)?;

    let ids = decode_uint256_array(log.data, ids_offset)?;
    let values = decode_uint256_array(log.data, values_offset)?;

    if ids.len() != values.len() {
        return Err(ParseError::LengthMismatch {
            ids: ids.len(),
            values: values.len(),
        });
    }

    Ok(Erc1155TransferBatch {
        chain_id: log.chain_id.clone(),
        contract_address: log.contract_address,
        tx_hash: log.tx_hash,
        log_index: log.log_index,
        operator,
        from,
        to,
        ids,
        values,
        is_mint: is_zero_address(&from),
    })
}

fn decode_uint256_array(data: &[u8], offset: usize) -> ParseResult<Vec<U256>> {
    if offset >= data.len() {
        return Err(ParseError::OffsetOutOfRange {
            offset,
            len: data.len(),
        });
    }
    let length = usize_at(data, offset)?;
    let tail_start = offset + WORD;
    let tail_len = length
        .checked_mul(WORD)
        .ok_or_else(|| ParseError::Malformed("array length overflow".to_string()))?;
    let tail_end = tail_start
        .checked_add(tail_len)
        .ok_or_else(|| ParseError::Malformed("array tail overflow".to_string()))?;
    if tail_end > data.len() {
        return Err(ParseError::DataTooShort {
            expected: tail_end,
            actual: data.len(),
        });
    }

    let mut elements = Vec::with_capacity(length);
    for i in 0..length {
        elements.push(u256_at(data, tail_start + i * WORD)?);
    }
    Ok(elements)
}

fn decode_string_at(data: &[u8], offset: usize) -> ParseResult<String> {
    if offset >= data.len() {
        return Err(ParseError::OffsetOutOfRange {
            offset,
            len: data.len(),
        });
    }
    let length = usize_at(data, offset)?;
    let start = offset + WORD;
    let end = start
        .checked_add(length)
        .ok_or_else(|| ParseError::Malformed("string length overflow".to_string()))?;
    if end > data.len() {
        return Err(ParseError::DataTooShort {
            expected: end,
            actual: data.len(),
        });
    }
    String::from_utf8(data[start..end].to_vec())
        .map_err(|e| ParseError::Malformed(format!("non-utf8 string payload: {e}")))
}

/// `[sig, creator, collection]`; data = `offset_name | offset_symbol |
/// max_supply | name-tail | symbol-tail`.
pub fn decode_collection_created(log: &RawLog<'_>) -> ParseResult<CollectionCreated> {
    if log.topics.len() != 3 {
        return Err(ParseError::WrongTopicCount {
            expected: 3,
            actual: log.topics.len(),
        });
    }
    if log.data.len() < 3 * WORD {
        return Err(ParseError::DataTooShort {
            expected: 3 * WORD,
            actual: log.data.len(),
        });
    }

    let creator = address_from_topic(&log.topics[1]);
    let collection = address_from_topic(&log.topics[2]);

    let name_offset = usize_at(log.data, 0)?;
    let symbol_offset = usize_at(log.data, WORD)?;
    let max_supply = u256_at(log.data, 2 * WORD)?;

    let name = decode_string_at(log.data, name_offset)?;
    let symbol = decode_string_at(log.data, symbol_offset)?;

    Ok(CollectionCreated {
        chain_id: log.chain_id.clone(),
        contract_address: log.contract_address,
        tx_hash: log.tx_hash,
        log_index: log.log_index,
        creator,
        collection,
        name,
        symbol,
        max_supply,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256};

    fn sig_topic(signature: &str) -> B256 {
        keccak256(signature.as_bytes())
    }

    fn addr_topic(addr: Address) -> B256 {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(addr.as_slice());
        B256::from(bytes)
    }

    fn word_u256(value: u64) -> [u8; 32] {
        U256::from(value).to_be_bytes()
    }

    #[test]
    fn erc721_transfer_from_zero_is_mint() {
        let to = address!("abcdef0123456789abcdef0123456789abcdef01");
        let topics = vec![
            sig_topic(ERC721_TRANSFER),
            addr_topic(Address::ZERO),
            addr_topic(to),
            B256::from(word_u256(7)),
        ];
        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &[],
        };
        let transfer = decode_erc721_transfer(&log).unwrap();
        assert!(transfer.is_mint);
        assert_eq!(transfer.to, to);
        assert_eq!(transfer.token_id, U256::from(7u64));
    }

    #[test]
    fn erc1155_transfer_single_s1_scenario() {
        let operator = address!("0123456789abcdef0123456789abcdef01234567");
        let to = address!("abcdef0123456789abcdef0123456789abcdef01");
        let topics = vec![
            sig_topic(ERC1155_TRANSFER_SINGLE),
            addr_topic(operator),
            addr_topic(Address::ZERO),
            addr_topic(to),
        ];
        let mut data = Vec::new();
        data.extend_from_slice(&word_u256(1));
        data.extend_from_slice(&word_u256(100));

        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &data,
        };
        let transfer = decode_erc1155_transfer_single(&log).unwrap();
        assert_eq!(transfer.operator, operator);
        assert_eq!(transfer.to, to);
        assert_eq!(transfer.id, U256::from(1u64));
        assert_eq!(transfer.value, U256::from(100u64));
        assert!(transfer.is_mint);
    }

    #[test]
    fn erc1155_transfer_single_rejects_short_data() {
        let topics = vec![
            sig_topic(ERC1155_TRANSFER_SINGLE),
            addr_topic(Address::ZERO),
            addr_topic(Address::ZERO),
            addr_topic(Address::ZERO),
        ];
        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &[0u8; 32],
        };
        assert!(matches!(
            decode_erc1155_transfer_single(&log),
            Err(ParseError::DataTooShort { .. })
        ));
    }

    fn build_batch_data(ids: &[u64], values: &[u64]) -> Vec<u8> {
        let ids_offset: u64 = 64;
        let values_offset = ids_offset + 32 + ids.len() as u64 * 32;

        let mut data = Vec::new();
        data.extend_from_slice(&word_u256(ids_offset));
        data.extend_from_slice(&word_u256(values_offset));

        data.extend_from_slice(&word_u256(ids.len() as u64));
        for id in ids {
            data.extend_from_slice(&word_u256(*id));
        }
        data.extend_from_slice(&word_u256(values.len() as u64));
        for value in values {
            data.extend_from_slice(&word_u256(*value));
        }
        data
    }

    #[test]
    fn erc1155_transfer_batch_decodes_parallel_arrays() {
        let topics = vec![
            sig_topic(ERC1155_TRANSFER_BATCH),
            addr_topic(Address::ZERO),
            addr_topic(Address::ZERO),
            addr_topic(Address::ZERO),
        ];
        let data = build_batch_data(&[1, 2, 3], &[10, 20, 30]);
        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &data,
        };
        let batch = decode_erc1155_transfer_batch(&log).unwrap();
        assert_eq!(batch.ids, vec![U256::from(1u64), U256::from(2u64), U256::from(3u64)]);
        assert_eq!(batch.values, vec![U256::from(10u64), U256::from(20u64), U256::from(30u64)]);
    }

    #[test]
    fn erc1155_transfer_batch_rejects_length_mismatch() {
        let topics = vec![
            sig_topic(ERC1155_TRANSFER_BATCH),
            addr_topic(Address::ZERO),
            addr_topic(Address::ZERO),
            addr_topic(Address::ZERO),
        ];
        // Hand-build mismatched lengths: ids has 2 elements, values has 1.
        let ids_offset: u64 = 64;
        let values_offset = ids_offset + 32 + 2 * 32;
        let mut data = Vec::new();
        data.extend_from_slice(&word_u256(ids_offset));
        data.extend_from_slice(&word_u256(values_offset));
        data.extend_from_slice(&word_u256(2));
        data.extend_from_slice(&word_u256(1));
        data.extend_from_slice(&word_u256(2));
        data.extend_from_slice(&word_u256(1));
        data.extend_from_slice(&word_u256(99));

        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &data,
        };
        assert!(matches!(
            decode_erc1155_transfer_batch(&log),
            Err(ParseError::LengthMismatch { ids: 2, values: 1 })
        ));
    }

    #[test]
    fn collection_created_decodes_strings_and_supply() {
        let creator = address!("0123456789abcdef0123456789abcdef01234567");
        let collection = address!("abcdef0123456789abcdef0123456789abcdef01");
        let topics = vec![sig_topic(COLLECTION_CREATED), addr_topic(creator), addr_topic(collection)];

        let name = b"Cool Cats";
        let symbol = b"COOL";
        let name_offset: u64 = 96;
        let name_padded = ((name.len() + 31) / 32) * 32;
        let symbol_offset = name_offset + 32 + name_padded as u64;

        let mut data = Vec::new();
        data.extend_from_slice(&word_u256(name_offset));
        data.extend_from_slice(&word_u256(symbol_offset));
        data.extend_from_slice(&word_u256(10_000));

        data.extend_from_slice(&word_u256(name.len() as u64));
        data.extend_from_slice(name);
        data.resize(data.len() + (name_padded - name.len()), 0);

        let symbol_padded = ((symbol.len() + 31) / 32) * 32;
        data.extend_from_slice(&word_u256(symbol.len() as u64));
        data.extend_from_slice(symbol);
        data.resize(data.len() + (symbol_padded - symbol.len()), 0);

        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &data,
        };
        let created = decode_collection_created(&log).unwrap();
        assert_eq!(created.creator, creator);
        assert_eq!(created.collection, collection);
        assert_eq!(created.name, "Cool Cats");
        assert_eq!(created.symbol, "COOL");
        assert_eq!(created.max_supply, U256::from(10_000u64));
    }

    #[test]
    fn parse_log_dispatches_on_signature() {
        let to = address!("abcdef0123456789abcdef0123456789abcdef01");
        let topics = vec![
            sig_topic(ERC721_TRANSFER),
            addr_topic(Address::ZERO),
            addr_topic(to),
            B256::from(word_u256(1)),
        ];
        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &[],
        };
        let event = parse_log(&log).unwrap();
        assert!(matches!(event, DomainEvent::Erc721Transfer(_)));
    }

    #[test]
    fn parse_log_rejects_unknown_signature() {
        let topics = vec![sig_topic("NotARealEvent(uint256)")];
        let log = RawLog {
            chain_id: ChainId::eip155(1),
            contract_address: Address::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            topics: &topics,
            data: &[],
        };
        assert!(matches!(parse_log(&log), Err(ParseError::UnknownSignature(_))));
    }
}
