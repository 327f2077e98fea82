use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::{
    boundary::{
        record::{BoundaryRecord, RecipientSet},
        store::BoundaryStore,
    },
    context::CallContext,
    errors::BoundaryError,
    events::{BoundarySet, RateLimitUpdated, RecipientsAdded, RecipientsRemoved},
};

/// Lifecycle rules over a [`BoundaryStore`].
///
/// Every write is keyed on `ctx.msg_sender`; there is no way to name another account. Writes
/// are staged on a copy of the record and only saved when the whole batch succeeds.
#[derive(Debug, Default)]
pub struct BoundaryManager<S> {
    store: S,
}

impl<S: BoundaryStore> BoundaryManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn checkpoint(&self) -> S::Checkpoint {
        self.store.checkpoint()
    }

    pub(crate) fn revert_to(&mut self, checkpoint: S::Checkpoint) {
        self.store.revert_to(checkpoint);
    }

    /// Current record for `(account, currency)`; the empty record when none was ever set.
    pub fn boundary(&self, account: Address, currency: Address) -> BoundaryRecord {
        self.store.load(account, currency).cloned().unwrap_or_default()
    }

    pub fn is_configured(&self, account: Address, currency: Address) -> bool {
        self.store
            .load(account, currency)
            .is_some_and(BoundaryRecord::is_configured)
    }

    pub fn is_eligible_recipient(&self, account: Address, currency: Address, recipient: Address) -> bool {
        self.store
            .load(account, currency)
            .is_some_and(|record| record.is_eligible(&recipient))
    }

    /// Set up a boundary from scratch. Fails if one is already configured.
    pub fn create_boundary(
        &mut self,
        ctx: &CallContext,
        currency: Address,
        max_fee_rate: U256,
        max_work_limit: U256,
        sorted_recipients: &[Address],
    ) -> Result<BoundarySet, BoundaryError> {
        let account = ctx.msg_sender;
        if self.is_configured(account, currency) {
            return Err(BoundaryError::AlreadyConfigured { account, currency });
        }

        let recipients = RecipientSet::from_sorted(sorted_recipients)?;
        self.store.save(
            account,
            currency,
            BoundaryRecord::new(max_fee_rate, max_work_limit, recipients),
        );
        debug!(%account, %currency, %max_fee_rate, %max_work_limit, recipients = sorted_recipients.len(), "boundary set");

        Ok(BoundarySet {
            account,
            currency,
            maxFeeRate: max_fee_rate,
            maxWorkLimit: max_work_limit,
            recipients: sorted_recipients.to_vec(),
        })
    }

    /// Overwrite rate and limit. Setting both to zero disables them.
    pub fn update_rate_limit(
        &mut self,
        ctx: &CallContext,
        currency: Address,
        max_fee_rate: U256,
        max_work_limit: U256,
    ) -> RateLimitUpdated {
        let account = ctx.msg_sender;
        let mut record = self.boundary(account, currency);
        record.max_fee_rate = max_fee_rate;
        record.max_work_limit = max_work_limit;
        self.store.save(account, currency, record);
        debug!(%account, %currency, %max_fee_rate, %max_work_limit, "rate limit updated");

        RateLimitUpdated {
            account,
            currency,
            maxFeeRate: max_fee_rate,
            maxWorkLimit: max_work_limit,
        }
    }

    pub fn add_recipients(
        &mut self,
        ctx: &CallContext,
        currency: Address,
        recipients: &[Address],
    ) -> Result<RecipientsAdded, BoundaryError> {
        let account = ctx.msg_sender;
        let mut record = self.boundary(account, currency);
        for &recipient in recipients {
            record.recipients.insert(recipient)?;
        }
        let count = record.allowed_recipient_count();
        self.store.save(account, currency, record);
        debug!(%account, %currency, added = recipients.len(), count, "recipients added");

        Ok(RecipientsAdded {
            account,
            currency,
            recipients: recipients.to_vec(),
        })
    }

    pub fn remove_recipients(
        &mut self,
        ctx: &CallContext,
        currency: Address,
        recipients: &[Address],
    ) -> Result<RecipientsRemoved, BoundaryError> {
        let account = ctx.msg_sender;
        let mut record = self.boundary(account, currency);
        for recipient in recipients {
            record.recipients.remove(recipient)?;
        }
        let count = record.allowed_recipient_count();
        self.store.save(account, currency, record);
        debug!(%account, %currency, removed = recipients.len(), count, "recipients removed");

        Ok(RecipientsRemoved {
            account,
            currency,
            recipients: recipients.to_vec(),
        })
    }
}
