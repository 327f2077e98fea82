//! Relay-and-refund module entry points.
//!
//! A relayer submits an owner-signed `execTransaction` call for an account together with refund
//! terms approved by a single owner. The module checks the relayer brought enough gas, that the
//! call is the account's execution entry point and nothing else, that the terms are signed for
//! the account's current nonce and fit the account's boundary, then has the account execute the
//! transaction and pays the refund out of the account's balance.
//!
//! Boundary writes go through the same struct so the account configures its own policy with
//! `msg.sender` as the only key.

use std::cell::RefCell;

use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::SolCall;
use relay_refund_types::{IRelayRefundModule, RefundTerms};
use tracing::{debug, info, warn};

use crate::{
    account::{IRelayAccount, SmartAccount},
    boundary::{BoundaryManager, BoundaryRecord, BoundaryStore},
    config::RelayConfig,
    context::CallContext,
    errors::{BoundaryError, RelayError},
    events::{ModuleEvent, SuccessfulExecution},
    gas::{refund_amount, GasMeter},
    guard::ReentrancyGuard,
    payout,
    utils::keys::selector_of,
    verifier::AuthorizationVerifier,
};

/// One relay submission.
#[derive(Debug, PartialEq, Eq)]
pub struct RelayRequest {
    /// ABI-encoded `execTransaction` call, including the owners' packed signatures.
    pub exec_call_data: Bytes,
    pub terms: RefundTerms,
    /// Single owner signature over the refund terms digest.
    pub terms_signature: Bytes,
}

impl RelayRequest {
    /// The module call a relayer would send on-chain for this request.
    pub fn to_call(&self) -> IRelayRefundModule::execTransactionWithRefundCall {
        IRelayRefundModule::execTransactionWithRefundCall {
            account: self.terms.account,
            execTransactionCallData: self.exec_call_data.clone(),
            nonce: self.terms.nonce,
            currency: self.terms.currency,
            workLimit: self.terms.workLimit,
            feeRate: self.terms.feeRate,
            recipient: self.terms.recipient,
            refundSignature: self.terms_signature.clone(),
        }
    }

    /// Length of the inbound call data charged by the gas schedule.
    pub fn encoded_len(&self) -> usize {
        self.to_call().abi_encode().len()
    }
}

/// Outcome of a successful relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayReceipt {
    pub call_data_hash: B256,
    pub work_consumed: U256,
    pub payment: U256,
    pub recipient: Address,
}

pub struct RelayRefundModule<S> {
    config: RelayConfig,
    verifier: AuthorizationVerifier,
    boundaries: RefCell<BoundaryManager<S>>,
    guard: ReentrancyGuard,
    events: RefCell<Vec<ModuleEvent>>,
}

impl<S: BoundaryStore> RelayRefundModule<S> {
    pub fn new(config: RelayConfig, store: S) -> Self {
        let verifier = AuthorizationVerifier::new(config.chain_id, config.module_address);
        Self {
            config,
            verifier,
            boundaries: RefCell::new(BoundaryManager::new(store)),
            guard: ReentrancyGuard::new(),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn address(&self) -> Address {
        self.config.module_address
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn verifier(&self) -> &AuthorizationVerifier {
        &self.verifier
    }

    /// Drain the events published so far.
    pub fn take_events(&self) -> Vec<ModuleEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn emit(&self, event: impl Into<ModuleEvent>) {
        self.events.borrow_mut().push(event.into());
    }

    // --- boundary manager surface -------------------------------------------------------------

    pub fn create_boundary(
        &self,
        ctx: &CallContext,
        currency: Address,
        max_fee_rate: U256,
        max_work_limit: U256,
        sorted_recipients: &[Address],
    ) -> Result<(), BoundaryError> {
        let event = self.boundaries.borrow_mut().create_boundary(
            ctx,
            currency,
            max_fee_rate,
            max_work_limit,
            sorted_recipients,
        )?;
        self.emit(event);
        Ok(())
    }

    pub fn update_rate_limit(
        &self,
        ctx: &CallContext,
        currency: Address,
        max_fee_rate: U256,
        max_work_limit: U256,
    ) {
        let event = self
            .boundaries
            .borrow_mut()
            .update_rate_limit(ctx, currency, max_fee_rate, max_work_limit);
        self.emit(event);
    }

    pub fn add_recipients(
        &self,
        ctx: &CallContext,
        currency: Address,
        recipients: &[Address],
    ) -> Result<(), BoundaryError> {
        let event = self
            .boundaries
            .borrow_mut()
            .add_recipients(ctx, currency, recipients)?;
        self.emit(event);
        Ok(())
    }

    pub fn remove_recipients(
        &self,
        ctx: &CallContext,
        currency: Address,
        recipients: &[Address],
    ) -> Result<(), BoundaryError> {
        let event = self
            .boundaries
            .borrow_mut()
            .remove_recipients(ctx, currency, recipients)?;
        self.emit(event);
        Ok(())
    }

    pub fn boundary(&self, account: Address, currency: Address) -> BoundaryRecord {
        self.boundaries.borrow().boundary(account, currency)
    }

    pub fn is_configured(&self, account: Address, currency: Address) -> bool {
        self.boundaries.borrow().is_configured(account, currency)
    }

    pub fn is_eligible_recipient(&self, account: Address, currency: Address, recipient: Address) -> bool {
        self.boundaries
            .borrow()
            .is_eligible_recipient(account, currency, recipient)
    }

    // --- relay --------------------------------------------------------------------------------

    /// Relay `request` for `account` and pay the refund.
    ///
    /// All-or-nothing: on any failure the account is restored to its state at entry (nonce
    /// included), boundary writes made meanwhile are undone and no event is published.
    pub fn exec_transaction_with_refund<A, M>(
        &self,
        ctx: &CallContext,
        account: &mut A,
        meter: &M,
        request: &RelayRequest,
    ) -> Result<RelayReceipt, RelayError>
    where
        A: SmartAccount,
        M: GasMeter + ?Sized,
    {
        let _lock = self.guard.enter().ok_or_else(|| {
            warn!(account = %account.address(), "reentrant relay rejected");
            RelayError::Reentrancy
        })?;

        let checkpoint = account.checkpoint();
        let store_checkpoint = self.boundaries.borrow().checkpoint();
        let events_len = self.events.borrow().len();
        match self.relay(ctx, account, meter, request) {
            Ok(receipt) => {
                info!(
                    account = %account.address(),
                    payment = %receipt.payment,
                    recipient = %receipt.recipient,
                    "relayed transaction with refund"
                );
                self.emit(SuccessfulExecution {
                    account: account.address(),
                    callDataHash: receipt.call_data_hash,
                    payment: receipt.payment,
                });
                Ok(receipt)
            }
            Err(err) => {
                account.revert_to(checkpoint);
                self.boundaries.borrow_mut().revert_to(store_checkpoint);
                self.events.borrow_mut().truncate(events_len);
                warn!(account = %account.address(), error = %err, kind = ?err.kind(), "relay reverted");
                Err(err)
            }
        }
    }

    fn relay<A, M>(
        &self,
        ctx: &CallContext,
        account: &mut A,
        meter: &M,
        request: &RelayRequest,
    ) -> Result<RelayReceipt, RelayError>
    where
        A: SmartAccount,
        M: GasMeter + ?Sized,
    {
        let terms = &request.terms;
        let gas = &self.config.gas;

        // Gas: the relayer must have brought at least the signed work limit.
        let budget_at_entry = gas.budget_at_entry(meter.gas_left(), request.encoded_len());
        if budget_at_entry < terms.workLimit {
            return Err(RelayError::InsufficientGas {
                available: budget_at_entry,
                required: terms.workLimit,
            });
        }
        debug!(%budget_at_entry, work_limit = %terms.workLimit, "gas checked");

        // Method: only the account's owner-authorised execution entry point.
        let got = FixedBytes(selector_of(&request.exec_call_data));
        let expected = FixedBytes(IRelayAccount::execTransactionCall::SELECTOR);
        if got != expected {
            return Err(RelayError::InvalidMethodSignature { got, expected });
        }

        // Terms: bound to this account and its current nonce, one owner signature.
        let account_address = account.address();
        if terms.account != account_address {
            return Err(RelayError::AccountMismatch {
                expected: account_address,
                got: terms.account,
            });
        }
        let nonce = account.nonce();
        if terms.nonce != nonce {
            return Err(RelayError::NonceMismatch {
                expected: nonce,
                got: terms.nonce,
            });
        }
        self.verifier
            .verify_refund_signature(account, terms, &request.terms_signature)
            .map_err(RelayError::VerificationFailed)?;
        debug!(%nonce, "refund terms verified");

        // Boundary: recipient first, then the numeric limits.
        let boundary = self.boundary(account_address, terms.currency);
        check_refund_boundary(&boundary, terms)?;
        debug!("refund boundary checked");

        // Execute: the account checks its owners' signatures and advances its nonce.
        if !account.exec_transaction(&request.exec_call_data) {
            return Err(RelayError::ExecutionFailure);
        }

        // Refund.
        let work_consumed = gas.work_consumed(budget_at_entry, meter.gas_left());
        let payment = refund_amount(work_consumed, terms.workLimit, terms.feeRate).ok_or(
            RelayError::PaymentOverflow {
                work_used: work_consumed.min(terms.workLimit),
                fee_rate: terms.feeRate,
            },
        )?;
        let recipient = if terms.pays_relayer() { ctx.tx_origin } else { terms.recipient };
        payout::pay(self.address(), account, recipient, payment, terms.currency).map_err(|source| {
            RelayError::RefundFailure {
                recipient,
                payment,
                source,
            }
        })?;

        Ok(RelayReceipt {
            call_data_hash: keccak256(&request.exec_call_data),
            work_consumed,
            payment,
            recipient,
        })
    }
}

/// Recipient eligibility, then fee rate, then work limit.
fn check_refund_boundary(boundary: &BoundaryRecord, terms: &RefundTerms) -> Result<(), RelayError> {
    if !boundary.is_configured() {
        return Err(RelayError::InvalidRefundReceiver(terms.recipient));
    }
    if !boundary.is_eligible(&terms.recipient) {
        return Err(RelayError::RefundReceiverNotAllowed(terms.recipient));
    }
    if terms.feeRate > boundary.max_fee_rate || terms.workLimit > boundary.max_work_limit {
        return Err(RelayError::RefundGasBoundariesNotMet {
            fee_rate: terms.feeRate,
            max_fee_rate: boundary.max_fee_rate,
            work_limit: terms.workLimit,
            max_work_limit: boundary.max_work_limit,
        });
    }
    Ok(())
}
