use std::collections::BTreeSet;

use alloy_primitives::{Address, U256};

use crate::errors::BoundaryError;

/// Allow-list of payout recipients.
///
/// The explicit `u16` count mirrors the on-chain counter and is kept in lock-step with the set:
/// every mutation checks the counter first and only then touches the set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientSet {
    members: BTreeSet<Address>,
    count: u16,
}

impl RecipientSet {
    /// Build from a strictly ascending list.
    pub fn from_sorted(recipients: &[Address]) -> Result<Self, BoundaryError> {
        let count = u16::try_from(recipients.len()).map_err(|_| BoundaryError::CountOverflow {
            attempted: recipients.len(),
        })?;

        let mut members = BTreeSet::new();
        let mut previous: Option<Address> = None;
        for &recipient in recipients {
            if let Some(prev) = previous {
                if recipient <= prev {
                    return Err(BoundaryError::DuplicateOrUnsorted {
                        previous: prev,
                        recipient,
                    });
                }
            }
            members.insert(recipient);
            previous = Some(recipient);
        }

        Ok(Self { members, count })
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, recipient: &Address) -> bool {
        self.members.contains(recipient)
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }

    pub(crate) fn insert(&mut self, recipient: Address) -> Result<(), BoundaryError> {
        if self.members.contains(&recipient) {
            return Err(BoundaryError::DuplicateRecipient(recipient));
        }
        let next = self
            .count
            .checked_add(1)
            .ok_or(BoundaryError::CountOverflow {
                attempted: usize::from(self.count) + 1,
            })?;
        self.members.insert(recipient);
        self.count = next;
        Ok(())
    }

    pub(crate) fn remove(&mut self, recipient: &Address) -> Result<(), BoundaryError> {
        if !self.members.contains(recipient) {
            return Err(BoundaryError::UnknownRecipient(*recipient));
        }
        let next = self
            .count
            .checked_sub(1)
            .ok_or(BoundaryError::CountUnderflow)?;
        self.members.remove(recipient);
        self.count = next;
        Ok(())
    }
}

/// Refund policy for one `(account, currency)` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryRecord {
    /// Highest fee rate a single signer may approve; zero when unset.
    pub max_fee_rate: U256,
    /// Highest work limit a single signer may approve; zero when unset.
    pub max_work_limit: U256,
    pub(crate) recipients: RecipientSet,
}

impl BoundaryRecord {
    pub fn new(max_fee_rate: U256, max_work_limit: U256, recipients: RecipientSet) -> Self {
        Self {
            max_fee_rate,
            max_work_limit,
            recipients,
        }
    }

    /// A record is configured while any of its three dimensions is set.
    pub fn is_configured(&self) -> bool {
        !self.max_fee_rate.is_zero() || !self.max_work_limit.is_zero() || !self.recipients.is_empty()
    }

    /// Configured, and either the allow-list is empty (unrestricted) or `recipient` is on it.
    pub fn is_eligible(&self, recipient: &Address) -> bool {
        self.is_configured() && (self.recipients.is_empty() || self.recipients.contains(recipient))
    }

    pub fn allowed_recipient_count(&self) -> u16 {
        self.recipients.count()
    }

    pub fn recipients(&self) -> &RecipientSet {
        &self.recipients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(i: u32) -> Address {
        let mut b = [0u8; 20];
        b[16..].copy_from_slice(&i.to_be_bytes());
        Address::from(b)
    }

    #[test]
    fn from_sorted_rejects_unsorted_and_duplicates() {
        assert_eq!(
            RecipientSet::from_sorted(&[addr(2), addr(1)]),
            Err(BoundaryError::DuplicateOrUnsorted {
                previous: addr(2),
                recipient: addr(1)
            })
        );
        assert_eq!(
            RecipientSet::from_sorted(&[addr(1), addr(1)]),
            Err(BoundaryError::DuplicateOrUnsorted {
                previous: addr(1),
                recipient: addr(1)
            })
        );
    }

    #[test]
    fn zero_address_may_lead_the_list() {
        let set = RecipientSet::from_sorted(&[Address::ZERO, addr(1)]).unwrap();
        assert_eq!(set.count(), 2);
        assert!(set.contains(&Address::ZERO));
    }

    #[test]
    fn count_is_capped_at_u16_max() {
        let full: Vec<Address> = (0..u32::from(u16::MAX)).map(addr).collect();
        let mut set = RecipientSet::from_sorted(&full).unwrap();
        assert_eq!(set.count(), u16::MAX);

        assert_eq!(
            set.insert(addr(u32::from(u16::MAX))),
            Err(BoundaryError::CountOverflow { attempted: 65_536 })
        );
        assert_eq!(set.count(), u16::MAX);
        assert!(!set.contains(&addr(u32::from(u16::MAX))));

        let too_many: Vec<Address> = (0..=u32::from(u16::MAX)).map(addr).collect();
        assert_eq!(
            RecipientSet::from_sorted(&too_many),
            Err(BoundaryError::CountOverflow { attempted: 65_536 })
        );
    }

    #[test]
    fn configured_by_any_dimension() {
        assert!(!BoundaryRecord::default().is_configured());
        assert!(BoundaryRecord::new(U256::from(1u64), U256::ZERO, RecipientSet::default()).is_configured());
        assert!(BoundaryRecord::new(U256::ZERO, U256::from(1u64), RecipientSet::default()).is_configured());
        let list = RecipientSet::from_sorted(&[addr(1)]).unwrap();
        assert!(BoundaryRecord::new(U256::ZERO, U256::ZERO, list).is_configured());
    }

    proptest! {
        #[test]
        fn sorted_distinct_lists_are_accepted(raw in prop::collection::btree_set(any::<[u8; 20]>(), 0..64)) {
            let list: Vec<Address> = raw.into_iter().map(Address::from).collect();
            let set = RecipientSet::from_sorted(&list).unwrap();
            prop_assert_eq!(usize::from(set.count()), list.len());
            prop_assert!(list.iter().all(|a| set.contains(a)));
        }

        #[test]
        fn lists_with_a_repeat_are_rejected(
            raw in prop::collection::btree_set(any::<[u8; 20]>(), 1..64),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut list: Vec<Address> = raw.into_iter().map(Address::from).collect();
            let dup = list[pick.index(list.len())];
            list.push(dup);
            list.sort();
            let is_dup = matches!(
                RecipientSet::from_sorted(&list),
                Err(BoundaryError::DuplicateOrUnsorted { .. })
            );
            prop_assert!(is_dup);
        }

        #[test]
        fn count_tracks_cardinality(ops in prop::collection::vec((any::<bool>(), 0u8..16), 0..128)) {
            let mut set = RecipientSet::default();
            for (add, i) in ops {
                let a = Address::with_last_byte(i);
                let _ = if add { set.insert(a) } else { set.remove(&a) };
                prop_assert_eq!(usize::from(set.count()), set.iter().count());
            }
        }
    }
}
