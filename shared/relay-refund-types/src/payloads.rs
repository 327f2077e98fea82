use alloy_primitives::Address;
use alloy_sol_types::sol;

/// Currency identifier for the chain's native unit.
pub const NATIVE_CURRENCY: Address = Address::ZERO;

/// Recipient placeholder meaning "pay whoever submitted the relay".
pub const RELAYER_PLACEHOLDER: Address = Address::ZERO;

sol! {
    /// Owner-signed transaction executed by the account.
    ///
    /// Field order is part of the typed-data encoding and must not change.
    #[derive(Debug, PartialEq, Eq)]
    struct AccountTransaction {
        address account;
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 nonce;
    }

    /// Reimbursement terms approved by a single account owner.
    ///
    /// Field order is part of the typed-data encoding and must not change.
    #[derive(Debug, PartialEq, Eq)]
    struct RefundTerms {
        address account;
        uint256 nonce;
        address currency;
        uint256 workLimit;
        uint256 feeRate;
        address recipient;
    }
}

/// How the account dispatches the embedded call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CallKind {
    Call = 0,
    DelegateCall = 1,
}

impl TryFrom<u8> for CallKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CallKind::Call),
            1 => Ok(CallKind::DelegateCall),
            _ => Err(()),
        }
    }
}

impl From<CallKind> for u8 {
    fn from(kind: CallKind) -> Self {
        kind as u8
    }
}

impl RefundTerms {
    /// True when the signer left the payout recipient to be resolved at relay time.
    pub fn pays_relayer(&self) -> bool {
        self.recipient == RELAYER_PLACEHOLDER
    }
}
