use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use k256::{ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint};
use relay_refund_types::{
    hash_account_transaction, hash_refund_terms, pack_signatures, IRelayAccount, IRelayRefundModule,
    RefundTerms, SIGNATURE_LEN,
};

use crate::types::{TermsEnvelope, TransactionEnvelope};

/// Ethereum address controlled by `signing_key`.
pub fn signer_address(signing_key: &SigningKey) -> Address {
    let point = signing_key.verifying_key().as_affine().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Sign a 32-byte digest as-is and return `r || s || v` with `v` in {27, 28}.
pub fn sign_digest(digest: B256, signing_key: &SigningKey) -> Result<[u8; SIGNATURE_LEN], k256::ecdsa::Error> {
    let (signature, recovery_id) = signing_key.sign_prehash_recoverable(digest.as_slice())?;
    let mut out = [0u8; SIGNATURE_LEN];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recovery_id.to_byte();
    Ok(out)
}

/// Compute the refund terms digest (must match the module's `hash_refund_terms`).
pub fn refund_terms_digest(envelope: &TermsEnvelope) -> B256 {
    hash_refund_terms(envelope.domain_chain_id, envelope.domain_module, &envelope.terms)
}

/// Sign the terms digest and write the 65-byte signature into `envelope.signature`.
pub fn sign_refund_terms(envelope: &mut TermsEnvelope, signing_key: &SigningKey) -> Result<(), k256::ecdsa::Error> {
    let sig = sign_digest(refund_terms_digest(envelope), signing_key)?;
    envelope.signature = sig.to_vec();
    Ok(())
}

/// Compute the owner transaction digest (must match the account's own check).
pub fn transaction_digest(envelope: &TransactionEnvelope) -> B256 {
    hash_account_transaction(envelope.domain_chain_id, &envelope.tx)
}

/// Sign `digest` with every key and pack the signatures in signer order.
pub fn owner_signatures(digest: B256, signing_keys: &[SigningKey]) -> Result<Bytes, k256::ecdsa::Error> {
    let mut signed = Vec::with_capacity(signing_keys.len());
    for key in signing_keys {
        signed.push((signer_address(key), sign_digest(digest, key)?));
    }
    Ok(pack_signatures(signed))
}

/// Collect owner signatures for the transaction into `envelope.signatures`.
pub fn sign_account_transaction(
    envelope: &mut TransactionEnvelope,
    signing_keys: &[SigningKey],
) -> Result<(), k256::ecdsa::Error> {
    envelope.signatures = owner_signatures(transaction_digest(envelope), signing_keys)?;
    Ok(())
}

/// ABI-encode the account's `execTransaction` call carrying the packed owner signatures.
pub fn encode_exec_transaction(envelope: &TransactionEnvelope) -> Bytes {
    let tx = &envelope.tx;
    IRelayAccount::execTransactionCall {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: tx.operation,
        signatures: envelope.signatures.clone(),
    }
    .abi_encode()
    .into()
}

/// ABI-encode the relay module call a relayer submits.
pub fn encode_relay_call(terms: &TermsEnvelope, exec_call_data: &Bytes) -> Bytes {
    let t = &terms.terms;
    IRelayRefundModule::execTransactionWithRefundCall {
        account: t.account,
        execTransactionCallData: exec_call_data.clone(),
        nonce: t.nonce,
        currency: t.currency,
        workLimit: t.workLimit,
        feeRate: t.feeRate,
        recipient: t.recipient,
        refundSignature: terms.signature.clone().into(),
    }
    .abi_encode()
    .into()
}

/// Upper bound on what the terms can ever pay out: `workLimit * feeRate`, or `None` on overflow.
pub fn max_refund(terms: &RefundTerms) -> Option<U256> {
    terms.workLimit.checked_mul(terms.feeRate)
}
