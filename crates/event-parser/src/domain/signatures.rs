//! Event-signature table: name → topic hash, computed at startup by hashing
//! the canonical signature strings. A previous implementation hard-coded a
//! placeholder `CollectionCreatedSignature` that did not match the
//! keccak-256 of its own declared signature string; this table derives every
//! entry instead so that bug class cannot recur.

use std::sync::OnceLock;

use alloy_primitives::{keccak256, B256};

pub const ERC721_TRANSFER: &str = "Transfer(address,address,uint256)";
pub const ERC1155_TRANSFER_SINGLE: &str = "TransferSingle(address,address,address,uint256,uint256)";
pub const ERC1155_TRANSFER_BATCH: &str =
    "TransferBatch(address,address,address,uint256[],uint256[])";
pub const COLLECTION_CREATED: &str = "CollectionCreated(address,address,string,string,uint256)";

const CANONICAL_SIGNATURES: &[&str] = &[
    ERC721_TRANSFER,
    ERC1155_TRANSFER_SINGLE,
    ERC1155_TRANSFER_BATCH,
    COLLECTION_CREATED,
];

fn hash_signature(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}

/// Name → topic hash, and its inverse. Built once per process.
pub struct SignatureTable {
    entries: Vec<(&'static str, B256)>,
}

impl SignatureTable {
    fn build() -> Self {
        let entries = CANONICAL_SIGNATURES
            .iter()
            .map(|&sig| (sig, hash_signature(sig)))
            .collect();
        Self { entries }
    }

    pub fn global() -> &'static SignatureTable {
        static TABLE: OnceLock<SignatureTable> = OnceLock::new();
        TABLE.get_or_init(SignatureTable::build)
    }

    pub fn is_known_event(&self, signature: &B256) -> bool {
        self.entries.iter().any(|(_, hash)| hash == signature)
    }

    pub fn event_name(&self, signature: &B256) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, hash)| hash == signature)
            .map(|(name, _)| *name)
    }

    pub fn signature_of(&self, name: &str) -> Option<B256> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, hash)| *hash)
    }
}

/// Sanity check that `alloy_primitives::keccak256` and `sha3::Keccak256`
/// agree, exercised in tests rather than trusted blindly.
#[cfg(test)]
fn hash_signature_via_sha3(signature: &str) -> B256 {
    use sha3::{Digest, Keccak256};

    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    B256::from_slice(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_signature_is_known() {
        let table = SignatureTable::global();
        for sig in CANONICAL_SIGNATURES {
            let hash = hash_signature(sig);
            assert!(table.is_known_event(&hash));
            assert_eq!(table.event_name(&hash), Some(*sig));
        }
    }

    #[test]
    fn unknown_signature_is_not_known() {
        let table = SignatureTable::global();
        let bogus = hash_signature("NotARealEvent(uint256)");
        assert!(!table.is_known_event(&bogus));
        assert_eq!(table.event_name(&bogus), None);
    }

    #[test]
    fn alloy_and_sha3_keccak_agree() {
        for sig in CANONICAL_SIGNATURES {
            assert_eq!(hash_signature(sig), hash_signature_via_sha3(sig));
        }
    }

    #[test]
    fn collection_created_signature_is_derived_not_hard_coded() {
        // Regression guard for the placeholder bug: any hard-coded constant
        // drifting from the canonical string would fail this.
        let table = SignatureTable::global();
        let expected = hash_signature(COLLECTION_CREATED);
        assert_eq!(table.signature_of("CollectionCreated(address,address,string,string,uint256)"), Some(expected));
    }
}
