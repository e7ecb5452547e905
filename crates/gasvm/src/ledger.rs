//! Original storage values of the running transaction.

use crate::primitives::{Address, HashMap, U256};

/// Value of every touched storage slot as it was before the transaction began.
///
/// Net metered `SSTORE` prices a write by comparing this value with the present and new ones.
/// Entries are only added during a transaction, a frame revert does not remove them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageLedger {
    originals: HashMap<(Address, U256), U256>,
}

impl StorageLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the original value of a slot. The first recorded value wins.
    #[inline]
    pub fn record_original(&mut self, address: Address, key: U256, value: U256) {
        self.originals.entry((address, key)).or_insert(value);
    }

    /// Returns the original value of a slot, `None` if it was not recorded in this transaction.
    #[inline]
    pub fn original(&self, address: Address, key: U256) -> Option<U256> {
        self.originals.get(&(address, key)).copied()
    }

    /// Number of recorded slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Returns `true` if nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Clears the ledger at a transaction boundary.
    #[inline]
    pub fn reset(&mut self) {
        self.originals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_wins() {
        let mut ledger = StorageLedger::new();
        let address = Address::with_last_byte(1);
        ledger.record_original(address, U256::ZERO, U256::from(1));
        ledger.record_original(address, U256::ZERO, U256::from(2));
        assert_eq!(ledger.original(address, U256::ZERO), Some(U256::from(1)));
        assert_eq!(ledger.original(address, U256::from(1)), None);
        assert_eq!(ledger.original(Address::ZERO, U256::ZERO), None);
    }

    #[test]
    fn reset_clears_entries() {
        let mut ledger = StorageLedger::new();
        ledger.record_original(Address::ZERO, U256::ZERO, U256::from(3));
        assert_eq!(ledger.len(), 1);
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.original(Address::ZERO, U256::ZERO), None);
    }
}
