//! Account abstraction the module drives.
//!
//! The account owns its signer set, threshold and nonce. The module only asks it to verify
//! signatures, to run owner-authorised transactions through `execTransaction`, and to run
//! already-authorised module calls through its privileged entry point.

use alloy_primitives::{Address, Bytes, B256, U256};
use relay_refund_types::CallKind;

use crate::errors::AccountError;

pub use relay_refund_types::interfaces::{IRelayAccount, IERC20};

pub trait SmartAccount {
    /// Snapshot of whatever state a reverted operation must restore.
    type Checkpoint;

    fn address(&self) -> Address;

    /// Current replay nonce.
    fn nonce(&self) -> U256;

    /// Verify signatures against the account's full threshold.
    fn check_signatures(&self, data_hash: B256, data: &[u8], signatures: &[u8]) -> Result<(), AccountError>;

    /// Verify exactly `required` owner signatures.
    fn check_n_signatures(
        &self,
        data_hash: B256,
        data: &[u8],
        signatures: &[u8],
        required: usize,
    ) -> Result<(), AccountError>;

    /// Execution entry point: decodes an `execTransaction` call, checks its owner signatures,
    /// advances the nonce and dispatches the call. Reports whether it succeeded.
    fn exec_transaction(&mut self, call_data: &[u8]) -> bool;

    /// Privileged entry point for an enabled module. Returns success and the call's return data.
    fn exec_transaction_from_module(
        &mut self,
        module: Address,
        to: Address,
        value: U256,
        data: &[u8],
        operation: CallKind,
    ) -> (bool, Bytes);

    fn checkpoint(&self) -> Self::Checkpoint;

    /// Restore the state captured by `checkpoint`.
    fn revert_to(&mut self, checkpoint: Self::Checkpoint);
}
