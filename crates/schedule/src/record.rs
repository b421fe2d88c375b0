use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use byob_core::Address;

/// Evidence of the most recent executed occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub timestamp: DateTime<Utc>,
    pub tx_hash: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// One user's recurring-deposit intention.
///
/// Cancelled records are retained rather than deleted so that
/// `total_deposited` history survives cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: Uuid,
    pub owner: Address,
    pub token: Address,
    /// Per-occurrence deposit amount in the token's display units.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub interval_days: u32,
    /// The schedule is due once this timestamp has elapsed. Monotonically
    /// non-decreasing for the life of an active schedule.
    pub next_deposit: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Accumulate-only running total of executed amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_deposited: Decimal,
    pub last_execution: Option<ExecutionReceipt>,
    /// Tx hashes already applied to this schedule. A retried executor
    /// report with a known hash must not double-count `total_deposited`.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub applied_tx_hashes: BTreeSet<String>,
}

impl ScheduleRecord {
    pub fn interval(&self) -> Duration {
        Duration::days(i64::from(self.interval_days))
    }

    /// Due-selection predicate: active and `next_deposit` elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.next_deposit <= now
    }
}
