//! Shared types for the relay refund module: signable payloads, typed-data digests, ABI
//! interfaces and signature packing.

pub mod digest;
pub mod interfaces;
pub mod payloads;
pub mod signatures;

pub use digest::{domain_separator, hash_account_transaction, hash_refund_terms, typed_data_digest};
pub use interfaces::{IRelayAccount, IRelayRefundModule, IERC20};
pub use payloads::{AccountTransaction, CallKind, RefundTerms, NATIVE_CURRENCY, RELAYER_PLACEHOLDER};
pub use signatures::{pack_signatures, SIGNATURE_LEN};
