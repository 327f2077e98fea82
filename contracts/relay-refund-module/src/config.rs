use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::gas::GasSchedule;

/// Deployment parameters for a module instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Chain id bound into every typed-data domain.
    pub chain_id: u64,
    /// The module's own address: refund-terms domain and `msg.sender` for module calls.
    pub module_address: Address,
    pub gas: GasSchedule,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            module_address: Address::ZERO,
            gas: GasSchedule::default(),
        }
    }
}

impl RelayConfig {
    pub fn new(chain_id: u64, module_address: Address) -> Self {
        Self {
            chain_id,
            module_address,
            gas: GasSchedule::default(),
        }
    }

    pub fn with_gas(mut self, gas: GasSchedule) -> Self {
        self.gas = gas;
        self
    }
}
