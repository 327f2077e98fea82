use std::collections::BTreeMap;

use alloy_primitives::{Address, B256};

use crate::{boundary::record::BoundaryRecord, utils::keys::composite_key};

/// Persistence for boundary records keyed by `(account, currency)`.
///
/// A missing record and an all-zero record are the same thing: "not configured".
pub trait BoundaryStore {
    fn load(&self, account: Address, currency: Address) -> Option<&BoundaryRecord>;

    fn save(&mut self, account: Address, currency: Address, record: BoundaryRecord);

    /// Snapshot of every record, for undoing writes made during a failed relay.
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn revert_to(&mut self, checkpoint: Self::Checkpoint);
}

/// In-memory store, keyed like the on-chain mapping by `keccak256(account || currency)`.
#[derive(Debug, Default)]
pub struct InMemoryBoundaryStore {
    records: BTreeMap<B256, BoundaryRecord>,
}

impl InMemoryBoundaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BoundaryStore for InMemoryBoundaryStore {
    fn load(&self, account: Address, currency: Address) -> Option<&BoundaryRecord> {
        self.records.get(&composite_key(account, currency))
    }

    fn save(&mut self, account: Address, currency: Address, record: BoundaryRecord) {
        let key = composite_key(account, currency);
        if record == BoundaryRecord::default() {
            self.records.remove(&key);
        } else {
            self.records.insert(key, record);
        }
    }

    type Checkpoint = BTreeMap<B256, BoundaryRecord>;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.records.clone()
    }

    fn revert_to(&mut self, checkpoint: Self::Checkpoint) {
        self.records = checkpoint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    use crate::boundary::record::RecipientSet;

    #[test]
    fn revert_restores_records_written_after_the_checkpoint() {
        let mut store = InMemoryBoundaryStore::new();
        let account = Address::with_last_byte(0xA1);
        let kept = BoundaryRecord::new(U256::from(1u64), U256::from(1u64), RecipientSet::default());
        store.save(account, Address::ZERO, kept.clone());

        let checkpoint = store.checkpoint();
        store.save(account, Address::ZERO, BoundaryRecord::new(U256::from(9u64), U256::ZERO, RecipientSet::default()));
        store.save(account, Address::with_last_byte(0x70), kept.clone());
        store.revert_to(checkpoint);

        assert_eq!(store.load(account, Address::ZERO), Some(&kept));
        assert_eq!(store.load(account, Address::with_last_byte(0x70)), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn saving_an_empty_record_clears_the_slot() {
        let mut store = InMemoryBoundaryStore::new();
        let account = Address::with_last_byte(1);
        store.save(
            account,
            Address::ZERO,
            BoundaryRecord::new(U256::from(1u64), U256::ZERO, RecipientSet::default()),
        );
        assert_eq!(store.len(), 1);
        assert!(store.load(account, Address::ZERO).is_some());
        assert!(store.load(account, Address::with_last_byte(9)).is_none());

        store.save(account, Address::ZERO, BoundaryRecord::default());
        assert!(store.is_empty());
    }
}
