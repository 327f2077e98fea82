use alloy_primitives::Address;

/// Caller identity for one module entry point invocation.
///
/// Boundary writes key on `msg_sender`, so an account can only ever edit its own policy.
/// `tx_origin` is the externally owned account that submitted the outer transaction and is the
/// payout target when refund terms leave the recipient unset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub msg_sender: Address,
    pub tx_origin: Address,
}

impl CallContext {
    pub fn new(msg_sender: Address, tx_origin: Address) -> Self {
        Self {
            msg_sender,
            tx_origin,
        }
    }

    /// A call made directly by an externally owned account.
    pub fn direct(sender: Address) -> Self {
        Self::new(sender, sender)
    }
}
