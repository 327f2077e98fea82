//! Off-chain helpers for relayers and account owners: sign refund terms and owner transactions,
//! and build the call data the relay module expects.

pub mod encoder;
pub mod types;
