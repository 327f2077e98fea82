//! Signature recovery and owner-set verification.
//!
//! Accounts own their signer set and threshold; these helpers give an in-process account
//! implementation the same checks a multi-signature wallet performs on-chain: fixed 65-byte
//! `r || s || v` chunks, recovered signers strictly ascending, each one an owner.

use std::collections::BTreeSet;

use alloy_primitives::{keccak256, Address, B256};
use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use relay_refund_types::SIGNATURE_LEN;

use crate::errors::AccountError;

/// Ethereum address of a secp256k1 public key.
pub fn public_key_address(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the signer of a 32-byte digest from an `r || s || v` signature.
///
/// Accepts `v` in {27, 28} and {0, 1}. Rejects anything that recovers to the zero address.
pub fn recover_signer(digest: B256, sig: &[u8]) -> Result<Address, ()> {
    if sig.len() != SIGNATURE_LEN {
        return Err(());
    }
    let parity = match sig[64] {
        27 | 28 => sig[64] - 27,
        0 | 1 => sig[64],
        _ => return Err(()),
    };
    let signature = Signature::from_slice(&sig[..64]).map_err(|_| ())?;
    let recovery_id = RecoveryId::from_byte(parity).ok_or(())?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|_| ())?;

    let recovered = public_key_address(&key);
    if recovered == Address::ZERO {
        return Err(());
    }
    Ok(recovered)
}

/// Verify the first `required` signatures in `signatures` against `owners`.
pub fn check_owner_signatures(
    owners: &BTreeSet<Address>,
    data_hash: B256,
    signatures: &[u8],
    required: usize,
) -> Result<(), AccountError> {
    if required == 0 {
        return Err(AccountError::NotSetUp);
    }
    let needed = required * SIGNATURE_LEN;
    if signatures.len() < needed {
        return Err(AccountError::SignaturesTooShort {
            required: needed,
            actual: signatures.len(),
        });
    }

    let mut last: Option<Address> = None;
    for (i, chunk) in signatures[..needed].chunks_exact(SIGNATURE_LEN).enumerate() {
        let signer =
            recover_signer(data_hash, chunk).map_err(|_| AccountError::InvalidSignature(i))?;
        if last.is_some_and(|prev| signer <= prev) {
            return Err(AccountError::UnsortedSigners(signer));
        }
        if !owners.contains(&signer) {
            return Err(AccountError::NotOwner(signer));
        }
        last = Some(signer);
    }
    Ok(())
}
