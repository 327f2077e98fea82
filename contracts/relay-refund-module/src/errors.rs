use alloy_primitives::{Address, FixedBytes, U256};
use alloy_sol_types::SolError;
use thiserror::Error;

/// Solidity custom errors carried as revert data.
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        error AlreadyConfigured(address account, address currency);
        error DuplicateOrUnsorted(address previous, address recipient);
        error DuplicateRecipient(address recipient);
        error UnknownRecipient(address recipient);
        error CountOverflow(uint256 attempted);
        error CountUnderflow();

        error Reentrancy();
        error InsufficientGas(uint256 available, uint256 required);
        error InvalidMethodSignature(bytes4 got, bytes4 expected);
        error AccountMismatch(address expected, address got);
        error NonceMismatch(uint256 expected, uint256 got);
        error VerificationFailed();
        error InvalidRefundReceiver(address receiver);
        error RefundReceiverNotAllowed(address receiver);
        error RefundGasBoundariesNotMet(uint256 feeRate, uint256 maxFeeRate, uint256 workLimit, uint256 maxWorkLimit);
        error ExecutionFailure();
        error PaymentOverflow(uint256 workUsed, uint256 feeRate);
        error RefundFailure(address recipient, uint256 payment);
    }
}

/// Errors from boundary writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("boundary already configured for account {account} and currency {currency}")]
    AlreadyConfigured { account: Address, currency: Address },
    #[error("recipient {recipient} is not strictly greater than {previous}")]
    DuplicateOrUnsorted { previous: Address, recipient: Address },
    #[error("recipient {0} is already allowed")]
    DuplicateRecipient(Address),
    #[error("recipient {0} is not in the allow-list")]
    UnknownRecipient(Address),
    #[error("allowed recipient count {attempted} exceeds {}", u16::MAX)]
    CountOverflow { attempted: usize },
    #[error("allowed recipient count would drop below zero")]
    CountUnderflow,
}

impl BoundaryError {
    /// ABI-encoded custom error, as an on-chain revert would carry it.
    pub fn revert_data(&self) -> Vec<u8> {
        match self {
            Self::AlreadyConfigured { account, currency } => abi::AlreadyConfigured {
                account: *account,
                currency: *currency,
            }
            .abi_encode(),
            Self::DuplicateOrUnsorted { previous, recipient } => abi::DuplicateOrUnsorted {
                previous: *previous,
                recipient: *recipient,
            }
            .abi_encode(),
            Self::DuplicateRecipient(recipient) => abi::DuplicateRecipient {
                recipient: *recipient,
            }
            .abi_encode(),
            Self::UnknownRecipient(recipient) => abi::UnknownRecipient {
                recipient: *recipient,
            }
            .abi_encode(),
            Self::CountOverflow { attempted } => abi::CountOverflow {
                attempted: U256::from(*attempted),
            }
            .abi_encode(),
            Self::CountUnderflow => abi::CountUnderflow {}.abi_encode(),
        }
    }
}

/// Errors reported by an account's signature checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("account has no signing threshold configured")]
    NotSetUp,
    #[error("signature data too short: {required} bytes required, {actual} provided")]
    SignaturesTooShort { required: usize, actual: usize },
    #[error("signature {0} could not be recovered")]
    InvalidSignature(usize),
    #[error("recovered signer {0} is not an owner")]
    NotOwner(Address),
    #[error("signer {0} is out of order or repeated")]
    UnsortedSigners(Address),
    #[error("module {0} is not enabled on the account")]
    ModuleNotEnabled(Address),
}

/// Errors from the refund transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayoutError {
    #[error("native transfer of {amount} to {recipient} failed")]
    NativeTransferFailed { recipient: Address, amount: U256 },
    #[error("token {token} transfer call reverted")]
    TokenCallFailed { token: Address },
    #[error("token {token} transfer returned false")]
    TokenTransferRejected { token: Address },
    #[error("token {token} returned malformed data")]
    MalformedReturn { token: Address },
}

/// Coarse classification of relay failures, so a client knows whether to renegotiate terms,
/// re-sign, retry with more gas, or fix its integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Policy,
    Authorization,
    Resource,
    Integration,
}

/// Errors from the relay state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("relay already in progress")]
    Reentrancy,
    #[error("insufficient gas: {available} available, {required} required")]
    InsufficientGas { available: U256, required: U256 },
    #[error("invalid method signature {got}, expected {expected}")]
    InvalidMethodSignature {
        got: FixedBytes<4>,
        expected: FixedBytes<4>,
    },
    #[error("refund terms are for account {got}, relaying for {expected}")]
    AccountMismatch { expected: Address, got: Address },
    #[error("refund terms carry nonce {got}, account is at {expected}")]
    NonceMismatch { expected: U256, got: U256 },
    #[error("refund signature verification failed: {0}")]
    VerificationFailed(#[source] AccountError),
    #[error("refund receiver {0} is invalid: no boundary configured")]
    InvalidRefundReceiver(Address),
    #[error("refund receiver {0} is not allowed")]
    RefundReceiverNotAllowed(Address),
    #[error(
        "refund gas boundaries not met: fee rate {fee_rate} (max {max_fee_rate}), work limit {work_limit} (max {max_work_limit})"
    )]
    RefundGasBoundariesNotMet {
        fee_rate: U256,
        max_fee_rate: U256,
        work_limit: U256,
        max_work_limit: U256,
    },
    #[error("underlying transaction failed")]
    ExecutionFailure,
    #[error("refund of {work_used} gas at {fee_rate} overflows")]
    PaymentOverflow { work_used: U256, fee_rate: U256 },
    #[error("refund of {payment} to {recipient} failed: {source}")]
    RefundFailure {
        recipient: Address,
        payment: U256,
        #[source]
        source: PayoutError,
    },
}

impl RelayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidRefundReceiver(_)
            | Self::RefundReceiverNotAllowed(_)
            | Self::RefundGasBoundariesNotMet { .. } => FailureKind::Policy,
            Self::AccountMismatch { .. } | Self::NonceMismatch { .. } | Self::VerificationFailed(_) => {
                FailureKind::Authorization
            }
            Self::InsufficientGas { .. }
            | Self::ExecutionFailure
            | Self::PaymentOverflow { .. }
            | Self::RefundFailure { .. } => FailureKind::Resource,
            Self::Reentrancy | Self::InvalidMethodSignature { .. } => FailureKind::Integration,
        }
    }

    /// ABI-encoded custom error, as an on-chain revert would carry it.
    pub fn revert_data(&self) -> Vec<u8> {
        match self {
            Self::Reentrancy => abi::Reentrancy {}.abi_encode(),
            Self::InsufficientGas { available, required } => abi::InsufficientGas {
                available: *available,
                required: *required,
            }
            .abi_encode(),
            Self::InvalidMethodSignature { got, expected } => abi::InvalidMethodSignature {
                got: *got,
                expected: *expected,
            }
            .abi_encode(),
            Self::AccountMismatch { expected, got } => abi::AccountMismatch {
                expected: *expected,
                got: *got,
            }
            .abi_encode(),
            Self::NonceMismatch { expected, got } => abi::NonceMismatch {
                expected: *expected,
                got: *got,
            }
            .abi_encode(),
            Self::VerificationFailed(_) => abi::VerificationFailed {}.abi_encode(),
            Self::InvalidRefundReceiver(receiver) => abi::InvalidRefundReceiver {
                receiver: *receiver,
            }
            .abi_encode(),
            Self::RefundReceiverNotAllowed(receiver) => abi::RefundReceiverNotAllowed {
                receiver: *receiver,
            }
            .abi_encode(),
            Self::RefundGasBoundariesNotMet {
                fee_rate,
                max_fee_rate,
                work_limit,
                max_work_limit,
            } => abi::RefundGasBoundariesNotMet {
                feeRate: *fee_rate,
                maxFeeRate: *max_fee_rate,
                workLimit: *work_limit,
                maxWorkLimit: *max_work_limit,
            }
            .abi_encode(),
            Self::ExecutionFailure => abi::ExecutionFailure {}.abi_encode(),
            Self::PaymentOverflow { work_used, fee_rate } => abi::PaymentOverflow {
                workUsed: *work_used,
                feeRate: *fee_rate,
            }
            .abi_encode(),
            Self::RefundFailure { recipient, payment, .. } => abi::RefundFailure {
                recipient: *recipient,
                payment: *payment,
            }
            .abi_encode(),
        }
    }
}
