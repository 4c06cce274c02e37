use chrono::Utc;

use chain_client::Log;
use event_parser::SignatureTable;
use raw_event_store::RawEvent;
use shared_types::ChainId;

/// Build the raw-store row for a fetched log. Decoding happens separately;
/// this only captures what was observed on the wire, so a log with an
/// unrecognised signature is still durably recorded.
pub fn build_raw_event(chain_id: &ChainId, log: &Log, confirmations: u64) -> RawEvent {
    let signature = log.topics.first().copied().unwrap_or_default();
    let event_name = SignatureTable::global()
        .event_name(&signature)
        .map(|s| s.to_string());

    RawEvent {
        chain_id: chain_id.clone(),
        tx_hash: log.tx_hash.to_string(),
        log_index: log.log_index,
        block_number: log.block_number,
        block_hash: log.block_hash.to_string(),
        contract_address: log.address.to_string(),
        event_name,
        signature: signature.to_string(),
        topics: log.topics.iter().map(|t| t.to_string()).collect(),
        data: log.data.to_string(),
        confirmations,
        observed_at: Utc::now(),
        created_at: Utc::now(),
    }
}

/// Ascending `(block_number, log_index)`, the order a batch must be
/// processed in regardless of which filter a log was fetched under.
pub fn sort_logs(logs: &mut [Log]) {
    logs.sort_by_key(|l| (l.block_number, l.log_index));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, B256};

    #[test]
    fn raw_event_carries_resolved_signature_name() {
        let chain_id = ChainId::eip155(1);
        let sig = event_parser::SignatureTable::global()
            .signature_of(event_parser::ERC721_TRANSFER)
            .unwrap();
        let log = Log {
            block_number: 10,
            block_hash: B256::ZERO,
            tx_hash: B256::ZERO,
            log_index: 0,
            address: Address::ZERO,
            topics: vec![sig, B256::ZERO, B256::ZERO, B256::ZERO],
            data: Bytes::new(),
        };
        let raw = build_raw_event(&chain_id, &log, 5);
        assert_eq!(raw.event_name.as_deref(), Some(event_parser::ERC721_TRANSFER));
        assert_eq!(raw.confirmations, 5);
    }
}
