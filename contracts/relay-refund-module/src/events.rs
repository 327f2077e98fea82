//! Observable module events.
//!
//! Events are buffered by the module and only published once the operation that produced them
//! has fully succeeded, the way a reverted transaction drops its logs.

use alloy_primitives::{Address, LogData};
use alloy_sol_types::{sol, SolEvent};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    event BoundarySet(
        address indexed account,
        address indexed currency,
        uint256 maxFeeRate,
        uint256 maxWorkLimit,
        address[] recipients
    );

    #[derive(Debug, PartialEq, Eq)]
    event RateLimitUpdated(
        address indexed account,
        address indexed currency,
        uint256 maxFeeRate,
        uint256 maxWorkLimit
    );

    #[derive(Debug, PartialEq, Eq)]
    event RecipientsAdded(address indexed account, address indexed currency, address[] recipients);

    #[derive(Debug, PartialEq, Eq)]
    event RecipientsRemoved(address indexed account, address indexed currency, address[] recipients);

    #[derive(Debug, PartialEq, Eq)]
    event SuccessfulExecution(address indexed account, bytes32 callDataHash, uint256 payment);
}

/// Any event the module emits.
#[derive(Debug, PartialEq, Eq)]
pub enum ModuleEvent {
    BoundarySet(BoundarySet),
    RateLimitUpdated(RateLimitUpdated),
    RecipientsAdded(RecipientsAdded),
    RecipientsRemoved(RecipientsRemoved),
    SuccessfulExecution(SuccessfulExecution),
}

impl ModuleEvent {
    /// Account the event concerns.
    pub fn account(&self) -> Address {
        match self {
            Self::BoundarySet(e) => e.account,
            Self::RateLimitUpdated(e) => e.account,
            Self::RecipientsAdded(e) => e.account,
            Self::RecipientsRemoved(e) => e.account,
            Self::SuccessfulExecution(e) => e.account,
        }
    }

    /// Topics and data as they would appear in a transaction receipt.
    pub fn log_data(&self) -> LogData {
        match self {
            Self::BoundarySet(e) => e.encode_log_data(),
            Self::RateLimitUpdated(e) => e.encode_log_data(),
            Self::RecipientsAdded(e) => e.encode_log_data(),
            Self::RecipientsRemoved(e) => e.encode_log_data(),
            Self::SuccessfulExecution(e) => e.encode_log_data(),
        }
    }
}

impl From<BoundarySet> for ModuleEvent {
    fn from(e: BoundarySet) -> Self {
        Self::BoundarySet(e)
    }
}

impl From<RateLimitUpdated> for ModuleEvent {
    fn from(e: RateLimitUpdated) -> Self {
        Self::RateLimitUpdated(e)
    }
}

impl From<RecipientsAdded> for ModuleEvent {
    fn from(e: RecipientsAdded) -> Self {
        Self::RecipientsAdded(e)
    }
}

impl From<RecipientsRemoved> for ModuleEvent {
    fn from(e: RecipientsRemoved) -> Self {
        Self::RecipientsRemoved(e)
    }
}

impl From<SuccessfulExecution> for ModuleEvent {
    fn from(e: SuccessfulExecution) -> Self {
        Self::SuccessfulExecution(e)
    }
}
