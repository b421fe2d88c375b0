//! [`ScheduleManager`] — lifecycle rules, due-selection, and execution
//! recording over an injected [`ScheduleStore`].

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use byob_core::{Address, ReschedulePolicy, ScheduleError};

use crate::record::{ExecutionReceipt, ScheduleRecord};
use crate::store::ScheduleStore;

/// Unvalidated creation input. Address and numeric validation happens in
/// [`ScheduleManager::create`] so every deployment target shares one set
/// of rules.
#[derive(Debug, Clone)]
pub struct CreateSchedule {
    pub owner: String,
    pub token: String,
    pub amount: Decimal,
    pub interval_days: i64,
    /// Used verbatim as the first `next_deposit` when given; otherwise
    /// the first occurrence is one full interval after creation.
    pub start_time: Option<DateTime<Utc>>,
}

/// Upper bound on `interval_days` (100 years). Anything larger is
/// client error, and bounding here keeps datetime arithmetic far from
/// the `chrono` representable range.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Deposit schedule lifecycle manager.
pub struct ScheduleManager<S> {
    store: S,
    policy: ReschedulePolicy,
}

impl<S: ScheduleStore> ScheduleManager<S> {
    pub fn new(store: S, policy: ReschedulePolicy) -> Self {
        Self { store, policy }
    }

    /// Validate and persist a new active schedule. All-or-nothing: a
    /// validation failure persists nothing.
    pub fn create(
        &self,
        input: CreateSchedule,
        now: DateTime<Utc>,
    ) -> Result<ScheduleRecord, ScheduleError> {
        let owner = Address::parse(&input.owner)?;
        let token = Address::parse(&input.token)?;
        if input.amount <= Decimal::ZERO {
            return Err(ScheduleError::InvalidAmount(input.amount.to_string()));
        }
        let interval_days = u32::try_from(input.interval_days)
            .ok()
            .filter(|d| (1..=MAX_INTERVAL_DAYS).contains(d))
            .ok_or_else(|| ScheduleError::InvalidInterval(input.interval_days.to_string()))?;

        let next_deposit = match input.start_time {
            Some(start) => start,
            None => now
                .checked_add_signed(Duration::days(i64::from(interval_days)))
                .ok_or_else(|| ScheduleError::InvalidInterval(interval_days.to_string()))?,
        };

        let record = ScheduleRecord {
            id: Uuid::new_v4(),
            owner,
            token,
            amount: input.amount,
            interval_days,
            next_deposit,
            is_active: true,
            created_at: now,
            cancelled_at: None,
            total_deposited: Decimal::ZERO,
            last_execution: None,
            applied_tx_hashes: BTreeSet::new(),
        };
        self.store.put(record.clone())?;
        debug!(id = %record.id, owner = %record.owner, "schedule created");
        Ok(record)
    }

    /// Deactivate a schedule. The record is retained for history.
    /// Re-cancelling an already-cancelled schedule is a no-op success.
    pub fn cancel(&self, id: Uuid, now: DateTime<Utc>) -> Result<ScheduleRecord, ScheduleError> {
        let record = self.store.update(id, |rec| {
            if rec.is_active {
                rec.is_active = false;
                rec.cancelled_at = Some(now);
            }
            Ok(())
        })?;
        debug!(id = %id, "schedule cancelled");
        Ok(record)
    }

    /// Active schedules whose `next_deposit` has elapsed, ordered by
    /// ascending `next_deposit` (ties broken by id).
    ///
    /// Read-only: advancement only happens via [`record_execution`], so
    /// re-listing the same due schedule until an executor commits is the
    /// expected behavior.
    ///
    /// [`record_execution`]: ScheduleManager::record_execution
    pub fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let mut due: Vec<ScheduleRecord> = self
            .store
            .list_all()?
            .into_iter()
            .filter(|r| r.is_due(now))
            .collect();
        due.sort_by(|a, b| a.next_deposit.cmp(&b.next_deposit).then(a.id.cmp(&b.id)));
        Ok(due)
    }

    /// Apply the bookkeeping effect of an externally-executed deposit:
    /// advance `next_deposit`, accumulate `total_deposited` exactly, and
    /// record the receipt. Assumes the on-chain transfer already
    /// succeeded; performs no chain interaction.
    ///
    /// Recording the same `tx_hash` twice fails with `DuplicateExecution`
    /// without touching the record, so executor retries are safe.
    pub fn record_execution(
        &self,
        id: Uuid,
        tx_hash: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<ScheduleRecord, ScheduleError> {
        if amount <= Decimal::ZERO {
            return Err(ScheduleError::InvalidAmount(amount.to_string()));
        }
        let policy = self.policy;
        let record = self.store.update(id, |rec| {
            if rec.applied_tx_hashes.contains(tx_hash) {
                return Err(ScheduleError::DuplicateExecution(tx_hash.to_string()));
            }
            rec.next_deposit = next_occurrence(policy, rec.next_deposit, rec.interval(), now)?;
            rec.total_deposited += amount;
            rec.last_execution = Some(ExecutionReceipt {
                timestamp: now,
                tx_hash: tx_hash.to_string(),
                amount,
            });
            rec.applied_tx_hashes.insert(tx_hash.to_string());
            Ok(())
        })?;
        debug!(id = %id, tx_hash, %amount, "execution recorded");
        Ok(record)
    }

    pub fn get(&self, id: Uuid) -> Result<ScheduleRecord, ScheduleError> {
        self.store
            .get(id)?
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    /// Owner-scoped listing. The raw owner string is canonicalized before
    /// lookup, so mixed-case queries match.
    pub fn list_by_owner(&self, owner: &str) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let owner = Address::parse(owner)?;
        self.store.list_by_owner(&owner)
    }
}

/// Compute the occurrence after an execution at `now`.
///
/// Both arms keep `next_deposit` non-decreasing even if an executor
/// records ahead of the due time. Datetime overflow (a schedule parked
/// near the end of the representable range) is reported as an error
/// rather than panicking, leaving the record untouched.
fn next_occurrence(
    policy: ReschedulePolicy,
    previous: DateTime<Utc>,
    interval: Duration,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let overflow = || ScheduleError::InvalidInterval(format!("{} days", interval.num_days()));
    match policy {
        ReschedulePolicy::FromExecution => now
            .checked_add_signed(interval)
            .map(|next| next.max(previous))
            .ok_or_else(overflow),
        ReschedulePolicy::FixedGrid => {
            // Step the grid past `now` so downtime never queues a burst
            // of catch-up occurrences.
            let mut next = previous.checked_add_signed(interval).ok_or_else(overflow)?;
            while next <= now {
                next = next.checked_add_signed(interval).ok_or_else(overflow)?;
            }
            Ok(next)
        }
    }
}
