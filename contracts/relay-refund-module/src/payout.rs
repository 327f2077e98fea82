//! Refund transfers out of the account's own balance.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use relay_refund_types::{CallKind, NATIVE_CURRENCY};
use tracing::debug;

use crate::{
    account::{SmartAccount, IERC20},
    errors::PayoutError,
};

/// Pay `amount` of `currency` from `account` to `recipient`, as `module`.
///
/// Native refunds are a plain value transfer. Token refunds call `transfer` and accept either
/// empty return data or an ABI `true`; anything else is a failure.
pub fn pay<A: SmartAccount>(
    module: Address,
    account: &mut A,
    recipient: Address,
    amount: U256,
    currency: Address,
) -> Result<(), PayoutError> {
    if amount.is_zero() {
        return Ok(());
    }

    if currency == NATIVE_CURRENCY {
        let (ok, _) = account.exec_transaction_from_module(module, recipient, amount, &[], CallKind::Call);
        if !ok {
            return Err(PayoutError::NativeTransferFailed { recipient, amount });
        }
        debug!(%recipient, %amount, "native refund paid");
        return Ok(());
    }

    let data = IERC20::transferCall { to: recipient, amount }.abi_encode();
    let (ok, ret) = account.exec_transaction_from_module(module, currency, U256::ZERO, &data, CallKind::Call);
    if !ok {
        return Err(PayoutError::TokenCallFailed { token: currency });
    }
    if !ret.is_empty() {
        let decoded = IERC20::transferCall::abi_decode_returns(&ret, true)
            .map_err(|_| PayoutError::MalformedReturn { token: currency })?;
        if !decoded.success {
            return Err(PayoutError::TokenTransferRejected { token: currency });
        }
    }
    debug!(%recipient, %amount, token = %currency, "token refund paid");
    Ok(())
}
