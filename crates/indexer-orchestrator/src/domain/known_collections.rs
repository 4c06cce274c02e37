use std::collections::HashSet;

use alloy_primitives::Address;
use parking_lot::RwLock;

/// Contract addresses observed via `CollectionCreated` on this chain, kept
/// in memory so each tick knows which mint filters to run. Rebuilt from the
/// catalog on process restart by the orchestrator's bootstrap step.
#[derive(Default)]
pub struct KnownCollections {
    addresses: RwLock<HashSet<Address>>,
}

impl KnownCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(addresses: impl IntoIterator<Item = Address>) -> Self {
        let this = Self::new();
        this.addresses.write().extend(addresses);
        this
    }

    pub fn observe(&self, address: Address) {
        self.addresses.write().insert(address);
    }

    pub fn all(&self) -> Vec<Address> {
        self.addresses.read().iter().copied().collect()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.read().contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn observed_addresses_are_deduplicated() {
        let registry = KnownCollections::new();
        let addr = address!("0000000000000000000000000000000000c0de");
        registry.observe(addr);
        registry.observe(addr);
        assert_eq!(registry.all().len(), 1);
        assert!(registry.contains(&addr));
    }
}
