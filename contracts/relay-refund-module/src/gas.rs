//! Resource accounting for relayed executions.
//!
//! The execution environment's metering is behind [`GasMeter`]; the constants used to
//! approximate what it charged before and after the module ran are a [`GasSchedule`].

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Source of the remaining execution budget.
pub trait GasMeter {
    fn gas_left(&self) -> u64;
}

/// Cost model used to turn meter readings into the work a relayer actually paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
    /// Fixed per-transaction charge already spent before the module runs.
    pub intrinsic_overhead: u64,
    /// Charge per byte of inbound call data.
    pub calldata_byte_cost: u64,
    /// Work still to be spent after the final meter reading (payout and bookkeeping).
    pub refund_overhead: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            intrinsic_overhead: 21_000,
            calldata_byte_cost: 16,
            refund_overhead: 30_000,
        }
    }
}

impl GasSchedule {
    /// Budget the relayer supplied, reconstructed at module entry.
    pub fn budget_at_entry(&self, gas_left: u64, payload_len: usize) -> U256 {
        let calldata = U256::from(self.calldata_byte_cost).saturating_mul(U256::from(payload_len));
        U256::from(gas_left)
            .saturating_add(U256::from(self.intrinsic_overhead))
            .saturating_add(calldata)
    }

    /// Work consumed between entry and `gas_left_now`, plus the trailing refund overhead.
    pub fn work_consumed(&self, budget_at_entry: U256, gas_left_now: u64) -> U256 {
        budget_at_entry
            .saturating_sub(U256::from(gas_left_now))
            .saturating_add(U256::from(self.refund_overhead))
    }
}

/// `min(work_consumed, work_limit) * fee_rate`, or `None` on overflow.
pub fn refund_amount(work_consumed: U256, work_limit: U256, fee_rate: U256) -> Option<U256> {
    work_consumed.min(work_limit).checked_mul(fee_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 10_000_000_000;
    const LIMIT: u64 = 120_000;

    #[test]
    fn budget_counts_intrinsic_and_calldata() {
        let schedule = GasSchedule::default();
        assert_eq!(schedule.budget_at_entry(100_000, 10), U256::from(100_000 + 21_000 + 160));
    }

    #[test]
    fn consumed_includes_refund_overhead() {
        let schedule = GasSchedule {
            intrinsic_overhead: 0,
            calldata_byte_cost: 0,
            refund_overhead: 1_000,
        };
        let budget = schedule.budget_at_entry(500_000, 0);
        assert_eq!(schedule.work_consumed(budget, 450_000), U256::from(51_000u64));
    }

    #[test]
    fn payment_is_consumed_times_rate_below_limit() {
        let used = U256::from(80_000u64);
        assert_eq!(
            refund_amount(used, U256::from(LIMIT), U256::from(FEE)),
            Some(U256::from(80_000u64 * FEE))
        );
    }

    #[test]
    fn payment_never_exceeds_limit_times_rate() {
        for used in [119_999u64, 120_000, 120_001, 5_000_000] {
            let paid = refund_amount(U256::from(used), U256::from(LIMIT), U256::from(FEE)).unwrap();
            assert!(paid <= U256::from(LIMIT) * U256::from(FEE));
        }
        assert_eq!(
            refund_amount(U256::from(5_000_000u64), U256::from(LIMIT), U256::from(FEE)),
            Some(U256::from(LIMIT) * U256::from(FEE))
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(refund_amount(U256::MAX, U256::MAX, U256::from(2u64)), None);
    }

    #[test]
    fn schedule_fills_missing_fields_from_defaults() {
        let schedule: GasSchedule = serde_json::from_str(r#"{ "refund_overhead": 5 }"#).unwrap();
        assert_eq!(schedule.refund_overhead, 5);
        assert_eq!(schedule.intrinsic_overhead, 21_000);
    }
}
