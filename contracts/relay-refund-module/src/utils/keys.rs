//! Storage-key helpers.

use alloy_primitives::{keccak256, Address, B256};

/// Composite storage key = keccak256(account || currency).
///
/// Boundary records are scoped by both the account and the refund currency.
pub fn composite_key(account: Address, currency: Address) -> B256 {
    let mut buf = Vec::with_capacity(20 + 20);
    buf.extend_from_slice(account.as_slice());
    buf.extend_from_slice(currency.as_slice());
    keccak256(buf)
}

/// Leading 4-byte method selector of `call_data`, zero-padded when shorter.
pub fn selector_of(call_data: &[u8]) -> [u8; 4] {
    let mut sel = [0u8; 4];
    let n = call_data.len().min(4);
    sel[..n].copy_from_slice(&call_data[..n]);
    sel
}
