//! Owner signature packing.

use alloy_primitives::{Address, Bytes};

/// Length of one `r || s || v` ECDSA signature.
pub const SIGNATURE_LEN: usize = 65;

/// Concatenate owner signatures ordered by signer address ascending.
///
/// Accounts walk the blob expecting strictly increasing signers, so callers may collect
/// signatures in any order and still produce the one byte string that verifies.
pub fn pack_signatures(mut signatures: Vec<(Address, [u8; SIGNATURE_LEN])>) -> Bytes {
    signatures.sort_by_key(|(signer, _)| *signer);
    let mut out = Vec::with_capacity(signatures.len() * SIGNATURE_LEN);
    for (_, sig) in &signatures {
        out.extend_from_slice(sig);
    }
    out.into()
}
