//! Relay-and-refund module for multi-signature accounts.
//!
//! Accounts publish a per-currency refund boundary (maximum fee rate, maximum work limit and an
//! optional recipient allow-list). Relayers then submit owner-signed transactions together with
//! single-owner refund terms, and are reimbursed from the account once the transaction ran.

pub mod account;
pub mod boundary;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod gas;
pub mod guard;
pub mod payout;
pub mod refund_module;
pub mod utils;
pub mod verifier;

#[cfg(test)]
mod mock;

pub use account::SmartAccount;
pub use boundary::{BoundaryManager, BoundaryRecord, BoundaryStore, InMemoryBoundaryStore, RecipientSet};
pub use config::RelayConfig;
pub use context::CallContext;
pub use errors::{AccountError, BoundaryError, FailureKind, PayoutError, RelayError};
pub use events::ModuleEvent;
pub use gas::{GasMeter, GasSchedule};
pub use refund_module::{RelayReceipt, RelayRefundModule, RelayRequest};
pub use verifier::AuthorizationVerifier;
