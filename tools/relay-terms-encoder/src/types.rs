use alloy_primitives::{Address, Bytes};
use relay_refund_types::{AccountTransaction, RefundTerms};

/// Refund terms together with the domain they are signed under.
#[derive(Debug)]
pub struct TermsEnvelope {
    pub terms: RefundTerms,

    /// Domain separation parameters (used for digest construction).
    pub domain_chain_id: u64,
    /// The relay module that will verify the terms.
    pub domain_module: Address,

    /// Single owner signature (r||s||v) over the terms digest; empty until signed.
    pub signature: Vec<u8>,
}

impl TermsEnvelope {
    pub fn new(terms: RefundTerms, domain_chain_id: u64, domain_module: Address) -> Self {
        Self {
            terms,
            domain_chain_id,
            domain_module,
            signature: Vec::new(),
        }
    }
}

/// Owner transaction together with its packed owner signatures.
///
/// The domain's verifying contract is the account itself (`tx.account`).
#[derive(Debug)]
pub struct TransactionEnvelope {
    pub tx: AccountTransaction,
    pub domain_chain_id: u64,
    /// Owner signatures ordered by signer address; empty until signed.
    pub signatures: Bytes,
}

impl TransactionEnvelope {
    pub fn new(tx: AccountTransaction, domain_chain_id: u64) -> Self {
        Self {
            tx,
            domain_chain_id,
            signatures: Bytes::new(),
        }
    }
}
