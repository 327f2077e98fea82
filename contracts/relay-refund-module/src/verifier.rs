//! Digests and signature checks for relay authorisations.

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolStruct;
use relay_refund_types::{digest, RefundTerms};

use crate::{account::SmartAccount, errors::AccountError};

/// Refund terms need exactly one owner's approval, whatever the account threshold.
pub const REFUND_SIGNERS_REQUIRED: usize = 1;

/// Typed-data hashing bound to one chain and one module deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorizationVerifier {
    chain_id: u64,
    module: Address,
}

impl AuthorizationVerifier {
    pub fn new(chain_id: u64, module: Address) -> Self {
        Self { chain_id, module }
    }

    /// Digest a single owner signs to approve `terms` for this module.
    pub fn hash_refund_terms(&self, terms: &RefundTerms) -> B256 {
        digest::hash_refund_terms(self.chain_id, self.module, terms)
    }

    /// Ask `account` whether `signature` carries one owner's approval of `terms`.
    pub fn verify_refund_signature<A: SmartAccount + ?Sized>(
        &self,
        account: &A,
        terms: &RefundTerms,
        signature: &[u8],
    ) -> Result<(), AccountError> {
        account.check_n_signatures(
            self.hash_refund_terms(terms),
            &terms.eip712_encode_data(),
            signature,
            REFUND_SIGNERS_REQUIRED,
        )
    }
}
