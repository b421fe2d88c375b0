//! Tests for the schedule manager: lifecycle rules, due-selection, and
//! execution recording.

use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use byob_core::{ReschedulePolicy, ScheduleError};

use crate::manager::{CreateSchedule, ScheduleManager};
use crate::store::MemoryStore;

const OWNER: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";
const TOKEN: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

fn dt(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn make_input(amount: &str, interval_days: i64) -> CreateSchedule {
    CreateSchedule {
        owner: OWNER.to_string(),
        token: TOKEN.to_string(),
        amount: dec(amount),
        interval_days,
        start_time: None,
    }
}

fn make_manager() -> ScheduleManager<MemoryStore> {
    ScheduleManager::new(MemoryStore::new(), ReschedulePolicy::FromExecution)
}

// -- Validation --------------------------------------------------------

#[test]
fn create_rejects_bad_owner_address() {
    let manager = make_manager();
    let mut input = make_input("50", 7);
    input.owner = "not-an-address".to_string();

    let err = manager.create(input, dt(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidAddress(_)));
}

#[test]
fn create_rejects_bad_token_address() {
    let manager = make_manager();
    let mut input = make_input("50", 7);
    input.token = "0x1234".to_string();

    let err = manager.create(input, dt(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidAddress(_)));
}

#[test]
fn create_rejects_non_positive_amount() {
    let manager = make_manager();

    let err = manager.create(make_input("0", 7), dt(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidAmount(_)));

    let err = manager
        .create(make_input("-10", 7), dt(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidAmount(_)));
}

#[test]
fn create_rejects_non_positive_interval() {
    let manager = make_manager();

    let err = manager.create(make_input("50", 0), dt(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval(_)));

    let err = manager
        .create(make_input("50", -1), dt(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval(_)));
}

#[test]
fn create_rejects_oversized_interval() {
    let manager = make_manager();

    // u32::MAX days would overflow datetime arithmetic; it must come
    // back as a validation error, never a panic.
    let err = manager
        .create(make_input("50", i64::from(u32::MAX)), dt(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval(_)));

    let err = manager
        .create(
            make_input("50", i64::from(crate::MAX_INTERVAL_DAYS) + 1),
            dt(2024, 1, 1),
        )
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval(_)));

    // The bound itself is accepted.
    manager
        .create(make_input("50", i64::from(crate::MAX_INTERVAL_DAYS)), dt(2024, 1, 1))
        .unwrap();
}

#[test]
fn failed_create_persists_nothing() {
    let manager = make_manager();
    manager
        .create(make_input("0", 7), dt(2024, 1, 1))
        .unwrap_err();

    assert!(manager.list_by_owner(OWNER).unwrap().is_empty());
}

// -- Creation ----------------------------------------------------------

#[test]
fn default_next_deposit_is_one_interval_out() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);

    let record = manager.create(make_input("50", 7), t0).unwrap();

    assert_eq!(record.next_deposit, t0 + Duration::days(7));
    assert!(record.is_active);
    assert_eq!(record.total_deposited, Decimal::ZERO);
    assert_eq!(record.created_at, t0);
    assert!(record.last_execution.is_none());
}

#[test]
fn explicit_start_time_is_used_verbatim() {
    let manager = make_manager();
    let start = dt(2024, 6, 15);
    let mut input = make_input("50", 7);
    input.start_time = Some(start);

    let record = manager.create(input, dt(2024, 1, 1)).unwrap();
    assert_eq!(record.next_deposit, start);
}

#[test]
fn addresses_are_canonicalized_on_create() {
    let manager = make_manager();
    let record = manager.create(make_input("50", 7), dt(2024, 1, 1)).unwrap();

    assert_eq!(record.owner.as_str(), OWNER.to_ascii_lowercase());
    assert_eq!(record.token.as_str(), TOKEN.to_ascii_lowercase());

    // Mixed-case owner query finds the canonicalized record.
    let listed = manager.list_by_owner(&OWNER.to_ascii_uppercase().replace("0X", "0x")).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
}

// -- Due-selection -----------------------------------------------------

#[test]
fn list_due_includes_schedule_iff_next_deposit_elapsed() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let due = manager.create(make_input("50", 7), t0).unwrap();
    let not_due = manager.create(make_input("50", 30), t0).unwrap();

    let now = t0 + Duration::days(10);
    let listed = manager.list_due(now).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, due.id);
    assert_ne!(listed[0].id, not_due.id);
}

#[test]
fn list_due_boundary_is_inclusive() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("50", 7), t0).unwrap();

    // Exactly at next_deposit counts as due.
    let listed = manager.list_due(record.next_deposit).unwrap();
    assert_eq!(listed.len(), 1);

    // One second earlier does not.
    let listed = manager
        .list_due(record.next_deposit - Duration::seconds(1))
        .unwrap();
    assert!(listed.is_empty());
}

#[test]
fn list_due_orders_by_next_deposit_ascending() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let later = manager.create(make_input("50", 14), t0).unwrap();
    let earlier = manager.create(make_input("50", 7), t0).unwrap();

    let listed = manager.list_due(t0 + Duration::days(30)).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, earlier.id);
    assert_eq!(listed[1].id, later.id);
}

#[test]
fn list_due_does_not_advance_next_deposit() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("50", 7), t0).unwrap();
    let now = t0 + Duration::days(10);

    // Repeated polls keep returning the same due schedule unchanged.
    for _ in 0..3 {
        let listed = manager.list_due(now).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].next_deposit, record.next_deposit);
    }
}

// -- Cancellation ------------------------------------------------------

#[test]
fn cancel_is_terminal_for_due_selection() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("50", 7), t0).unwrap();

    let cancelled = manager.cancel(record.id, t0 + Duration::days(2)).unwrap();
    assert!(!cancelled.is_active);
    assert_eq!(cancelled.cancelled_at, Some(t0 + Duration::days(2)));

    // Never due again, however far ahead we look.
    assert!(manager.list_due(dt(2030, 1, 1)).unwrap().is_empty());
}

#[test]
fn cancel_twice_is_a_noop() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("50", 7), t0).unwrap();

    manager.cancel(record.id, t0 + Duration::days(2)).unwrap();
    let again = manager.cancel(record.id, t0 + Duration::days(5)).unwrap();

    // First cancellation timestamp is preserved.
    assert_eq!(again.cancelled_at, Some(t0 + Duration::days(2)));
}

#[test]
fn cancel_retains_history() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("100", 30), t0).unwrap();
    manager
        .record_execution(record.id, "0xaaa", dec("100"), t0 + Duration::days(31))
        .unwrap();
    manager.cancel(record.id, t0 + Duration::days(40)).unwrap();

    let kept = manager.get(record.id).unwrap();
    assert_eq!(kept.total_deposited, dec("100"));
    assert!(kept.last_execution.is_some());
}

#[test]
fn cancel_unknown_id_is_not_found() {
    let manager = make_manager();
    let err = manager.cancel(uuid::Uuid::new_v4(), dt(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ScheduleError::NotFound(_)));
}

// -- Execution recording -----------------------------------------------

#[test]
fn execution_advances_next_deposit_monotonically() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("50", 7), t0).unwrap();
    let previous = record.next_deposit;

    let now = t0 + Duration::days(8);
    let updated = manager
        .record_execution(record.id, "0xhash", dec("50"), now)
        .unwrap();

    assert_eq!(updated.next_deposit, now + Duration::days(7));
    assert!(updated.next_deposit > previous);
    assert_eq!(updated.total_deposited, dec("50"));

    let receipt = updated.last_execution.unwrap();
    assert_eq!(receipt.tx_hash, "0xhash");
    assert_eq!(receipt.amount, dec("50"));
    assert_eq!(receipt.timestamp, now);
}

#[test]
fn accumulation_is_exact_decimal_arithmetic() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("0.1", 1), t0).unwrap();

    let mut now = t0;
    for i in 0..10 {
        now += Duration::days(1);
        manager
            .record_execution(record.id, &format!("0x{:03}", i), dec("0.1"), now)
            .unwrap();
    }

    let updated = manager.get(record.id).unwrap();
    // Ten executions of 0.1 sum to exactly 1 — no float drift.
    assert_eq!(updated.total_deposited, dec("1"));
    assert_eq!(updated.total_deposited.to_string(), "1.0");
}

#[test]
fn duplicate_tx_hash_is_rejected_without_double_counting() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("50", 7), t0).unwrap();
    let now = t0 + Duration::days(8);

    let updated = manager
        .record_execution(record.id, "0xabc", dec("50"), now)
        .unwrap();

    let err = manager
        .record_execution(record.id, "0xabc", dec("50"), now + Duration::days(1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::DuplicateExecution(_)));

    // Nothing changed on the rejected retry.
    let current = manager.get(record.id).unwrap();
    assert_eq!(current.total_deposited, dec("50"));
    assert_eq!(current.next_deposit, updated.next_deposit);
}

#[test]
fn record_execution_unknown_id_is_not_found() {
    let manager = make_manager();
    let err = manager
        .record_execution(uuid::Uuid::new_v4(), "0xabc", dec("50"), dt(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::NotFound(_)));
}

#[test]
fn record_execution_rejects_non_positive_amount() {
    let manager = make_manager();
    let record = manager.create(make_input("50", 7), dt(2024, 1, 1)).unwrap();

    let err = manager
        .record_execution(record.id, "0xabc", dec("0"), dt(2024, 2, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidAmount(_)));
}

#[test]
fn record_execution_overflow_fails_cleanly() {
    let manager = make_manager();
    let mut input = make_input("50", 7);
    // Schedule parked at the end of the representable datetime range.
    input.start_time = Some(DateTime::<Utc>::MAX_UTC);
    let record = manager.create(input, dt(2024, 1, 1)).unwrap();

    let err = manager
        .record_execution(record.id, "0xabc", dec("50"), DateTime::<Utc>::MAX_UTC)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval(_)));

    // The failed recording left the record untouched.
    let current = manager.get(record.id).unwrap();
    assert_eq!(current.total_deposited, Decimal::ZERO);
    assert!(current.last_execution.is_none());
}

// -- Rescheduling policies ---------------------------------------------

#[test]
fn fixed_grid_policy_stays_on_the_original_grid() {
    let manager = ScheduleManager::new(MemoryStore::new(), ReschedulePolicy::FixedGrid);
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("100", 30), t0).unwrap();
    assert_eq!(record.next_deposit, dt(2024, 1, 31));

    // Executed a day late: next stays on the grid, not execution + 30.
    let updated = manager
        .record_execution(record.id, "0xabc", dec("100"), dt(2024, 2, 1))
        .unwrap();
    assert_eq!(updated.next_deposit, dt(2024, 3, 1));
}

#[test]
fn fixed_grid_policy_skips_missed_occurrences_after_downtime() {
    let manager = ScheduleManager::new(MemoryStore::new(), ReschedulePolicy::FixedGrid);
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("100", 30), t0).unwrap();

    // Executor was down for months; the grid steps past `now` in one
    // recording instead of queueing catch-up occurrences.
    let updated = manager
        .record_execution(record.id, "0xabc", dec("100"), dt(2024, 6, 15))
        .unwrap();
    assert!(updated.next_deposit > dt(2024, 6, 15));
    assert!(updated.next_deposit <= dt(2024, 6, 15) + Duration::days(30));
    assert_eq!(updated.total_deposited, dec("100"));
}

// -- End to end --------------------------------------------------------

#[test]
fn end_to_end_scenario() {
    let manager = make_manager();
    let t0 = dt(2024, 1, 1);
    let record = manager.create(make_input("100", 30), t0).unwrap();
    assert_eq!(record.next_deposit, dt(2024, 1, 31));

    let t1 = dt(2024, 2, 1);
    let due = manager.list_due(t1).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, record.id);

    let updated = manager
        .record_execution(record.id, "0xabc", dec("100"), t1)
        .unwrap();
    assert_eq!(updated.next_deposit, dt(2024, 3, 2));
    assert_eq!(updated.total_deposited, dec("100"));

    assert!(manager.list_due(t1).unwrap().is_empty());
}
