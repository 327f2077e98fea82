//! Typed-data (EIP-712 style) digests for the two signable payloads.
//!
//! Both digests are `keccak256("\x19\x01" || domainSeparator || hashStruct(payload))`. The domain
//! is bound to the chain id and to the identity of whoever verifies the payload: the account for
//! owner-signed transactions, the relay module for refund terms.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolStruct;

use crate::payloads::{AccountTransaction, RefundTerms};

/// `keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")` preimage.
pub const DOMAIN_TYPE: &[u8] = b"EIP712Domain(uint256 chainId,address verifyingContract)";

/// Domain separator for `(chain_id, verifying_contract)`.
pub fn domain_separator(chain_id: u64, verifying_contract: Address) -> B256 {
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(keccak256(DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(verifying_contract.into_word().as_slice());
    keccak256(buf)
}

/// Final digest: `keccak256("\x19\x01" || domainSeparator || structHash)`.
pub fn typed_data_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain_separator.as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

/// Digest the account's owners sign for an underlying transaction.
pub fn hash_account_transaction(chain_id: u64, tx: &AccountTransaction) -> B256 {
    typed_data_digest(domain_separator(chain_id, tx.account), tx.eip712_hash_struct())
}

/// Digest a single owner signs to approve reimbursement terms.
pub fn hash_refund_terms(chain_id: u64, module: Address, terms: &RefundTerms) -> B256 {
    typed_data_digest(domain_separator(chain_id, module), terms.eip712_hash_struct())
}
